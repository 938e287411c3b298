use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{CrmError, CrmResult};
use crate::model::{Id, Interaction, InteractionKind, Project, User};

pub fn insert(conn: &Connection, interaction: &Interaction) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO interactions (id, date, kind, completed, memo, project_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            interaction.id.value.to_string(),
            interaction.date.to_string(),
            interaction.kind.to_db_str(),
            interaction.completed as i32,
            interaction.memo,
            interaction.project_id.map(|id| id.value.to_string()),
        ],
    )?;
    replace_contacts(conn, interaction)?;
    Ok(())
}

pub fn update(conn: &Connection, interaction: &Interaction) -> CrmResult<()> {
    conn.execute(
        "UPDATE interactions SET date = ?1, kind = ?2, completed = ?3, memo = ?4, project_id = ?5
         WHERE id = ?6",
        params![
            interaction.date.to_string(),
            interaction.kind.to_db_str(),
            interaction.completed as i32,
            interaction.memo,
            interaction.project_id.map(|id| id.value.to_string()),
            interaction.id.value.to_string(),
        ],
    )?;
    replace_contacts(conn, interaction)?;
    Ok(())
}

pub fn delete(conn: &Connection, id: Id<Interaction>) -> CrmResult<()> {
    conn.execute(
        "DELETE FROM interaction_contacts WHERE interaction_id = ?1",
        params![id.value.to_string()],
    )?;
    conn.execute(
        "DELETE FROM interactions WHERE id = ?1",
        params![id.value.to_string()],
    )?;
    Ok(())
}

fn replace_contacts(conn: &Connection, interaction: &Interaction) -> CrmResult<()> {
    conn.execute(
        "DELETE FROM interaction_contacts WHERE interaction_id = ?1",
        params![interaction.id.value.to_string()],
    )?;

    for user_id in &interaction.contacts {
        conn.execute(
            "INSERT OR IGNORE INTO interaction_contacts (interaction_id, user_id) VALUES (?1, ?2)",
            params![interaction.id.value.to_string(), user_id.value.to_string()],
        )?;
    }

    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Interaction>) -> CrmResult<Option<Interaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, kind, completed, memo, project_id FROM interactions WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.value.to_string()], row_to_parts);

    match result {
        Ok(parts) => Ok(Some(parts_to_interaction(conn, parts)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All interactions the user participates in as a contact, most recent
/// first.
pub fn find_for_contact(conn: &Connection, user_id: Id<User>) -> CrmResult<Vec<Interaction>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.date, i.kind, i.completed, i.memo, i.project_id FROM interactions i
         JOIN interaction_contacts ic ON ic.interaction_id = i.id
         WHERE ic.user_id = ?1
         ORDER BY i.date DESC, i.created_at DESC",
    )?;

    let rows = stmt
        .query_map(params![user_id.value.to_string()], row_to_parts)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|parts| parts_to_interaction(conn, parts))
        .collect()
}

pub fn find_recent_for_contact(
    conn: &Connection,
    user_id: Id<User>,
    limit: i64,
) -> CrmResult<Vec<Interaction>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.date, i.kind, i.completed, i.memo, i.project_id FROM interactions i
         JOIN interaction_contacts ic ON ic.interaction_id = i.id
         WHERE ic.user_id = ?1
         ORDER BY i.date DESC, i.created_at DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(params![user_id.value.to_string(), limit], row_to_parts)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|parts| parts_to_interaction(conn, parts))
        .collect()
}

/// Incomplete interactions for the user, soonest first.
pub fn find_upcoming_for_contact(
    conn: &Connection,
    user_id: Id<User>,
) -> CrmResult<Vec<Interaction>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.date, i.kind, i.completed, i.memo, i.project_id FROM interactions i
         JOIN interaction_contacts ic ON ic.interaction_id = i.id
         WHERE ic.user_id = ?1 AND i.completed = 0
         ORDER BY i.date ASC, i.created_at ASC",
    )?;

    let rows = stmt
        .query_map(params![user_id.value.to_string()], row_to_parts)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|parts| parts_to_interaction(conn, parts))
        .collect()
}

/// Completed interactions for the user, most recent first.
pub fn find_completed_recent(
    conn: &Connection,
    user_id: Id<User>,
    limit: i64,
) -> CrmResult<Vec<Interaction>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.date, i.kind, i.completed, i.memo, i.project_id FROM interactions i
         JOIN interaction_contacts ic ON ic.interaction_id = i.id
         WHERE ic.user_id = ?1 AND i.completed = 1
         ORDER BY i.date DESC, i.created_at DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(params![user_id.value.to_string(), limit], row_to_parts)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|parts| parts_to_interaction(conn, parts))
        .collect()
}

/// Substring search over kind, linked project name, contact names, and memo,
/// OR-combined and deduplicated.
pub fn search(conn: &Connection, query: &str) -> CrmResult<Vec<Interaction>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(
        "SELECT DISTINCT i.id, i.date, i.kind, i.completed, i.memo, i.project_id
         FROM interactions i
         LEFT JOIN projects p ON i.project_id = p.id
         LEFT JOIN interaction_contacts ic ON ic.interaction_id = i.id
         LEFT JOIN users u ON ic.user_id = u.id
         WHERE LOWER(i.kind) LIKE ?1
            OR LOWER(COALESCE(p.name, '')) LIKE ?1
            OR LOWER(COALESCE(u.first_name, '')) LIKE ?1
            OR LOWER(COALESCE(u.last_name, '')) LIKE ?1
            OR LOWER(COALESCE(i.memo, '')) LIKE ?1
         ORDER BY i.date DESC, i.id",
    )?;

    let rows = stmt
        .query_map(params![pattern], row_to_parts)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|parts| parts_to_interaction(conn, parts))
        .collect()
}

type InteractionParts = (String, String, String, i32, Option<String>, Option<String>);

fn row_to_parts(row: &rusqlite::Row) -> rusqlite::Result<InteractionParts> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn parts_to_interaction(conn: &Connection, parts: InteractionParts) -> CrmResult<Interaction> {
    let (id_str, date_str, kind_str, completed, memo, project_id_str) = parts;

    let id: Id<Interaction> = Id::new(
        Uuid::parse_str(&id_str).map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
    );
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| CrmError::Other(format!("Invalid date: {}", e)))?;
    let kind = InteractionKind::from_db_str(&kind_str)
        .ok_or_else(|| CrmError::Other(format!("Unknown interaction kind: {}", kind_str)))?;
    let project_id: Option<Id<Project>> = match project_id_str {
        Some(s) => Some(Id::new(
            Uuid::parse_str(&s).map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        )),
        None => None,
    };

    Ok(Interaction {
        id,
        date,
        kind,
        completed: completed != 0,
        memo,
        project_id,
        contacts: find_contact_ids(conn, id)?,
    })
}

fn find_contact_ids(conn: &Connection, interaction_id: Id<Interaction>) -> CrmResult<Vec<Id<User>>> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM interaction_contacts WHERE interaction_id = ?1 ORDER BY user_id",
    )?;

    let ids = stmt
        .query_map(params![interaction_id.value.to_string()], |row| {
            let id_str: String = row.get(0)?;
            Ok(id_str)
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|s| {
            Ok(Id::new(
                Uuid::parse_str(&s)
                    .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
            ))
        })
        .collect::<CrmResult<Vec<_>>>()?;

    Ok(ids)
}
