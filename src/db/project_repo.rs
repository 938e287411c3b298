use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{CrmError, CrmResult};
use crate::model::{Business, Id, Project, ProjectKind, ProjectRelationship, ProjectStatus, User};

const PROJECT_COLUMNS: &str =
    "id, business_id, name, kind, status, description, point_person_id, tracking_ref";

pub fn insert(conn: &Connection, project: &Project) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO projects (id, business_id, name, kind, status, description, point_person_id, tracking_ref)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            project.id.value.to_string(),
            project.business_id.value.to_string(),
            project.name,
            project.kind.to_db_str(),
            project.status.to_db_str(),
            project.description,
            project.point_person_id.value.to_string(),
            project.tracking_ref,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, project: &Project) -> CrmResult<()> {
    conn.execute(
        "UPDATE projects SET name = ?1, kind = ?2, status = ?3, description = ?4,
         point_person_id = ?5, tracking_ref = ?6 WHERE id = ?7",
        params![
            project.name,
            project.kind.to_db_str(),
            project.status.to_db_str(),
            project.description,
            project.point_person_id.value.to_string(),
            project.tracking_ref,
            project.id.value.to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Project>) -> CrmResult<Option<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1",
    ))?;

    let result = stmt.query_row(params![id.value.to_string()], |row| Ok(row_to_project(row)));

    match result {
        Ok(project) => Ok(Some(project?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> CrmResult<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY name",
    ))?;

    let projects = stmt
        .query_map([], |row| Ok(row_to_project(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

pub fn find_by_business(conn: &Connection, business_id: Id<Business>) -> CrmResult<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE business_id = ?1 ORDER BY name",
    ))?;

    let projects = stmt
        .query_map(params![business_id.value.to_string()], |row| {
            Ok(row_to_project(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

/// Projects the user participates in as a contact.
pub fn find_by_contact(conn: &Connection, user_id: Id<User>) -> CrmResult<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects
         WHERE id IN (SELECT project_id FROM project_relationships WHERE user_id = ?1)
         ORDER BY name",
    ))?;

    let projects = stmt
        .query_map(params![user_id.value.to_string()], |row| {
            Ok(row_to_project(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

/// Substring search over name and description.
pub fn search(conn: &Connection, query: &str) -> CrmResult<Vec<Project>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects
         WHERE LOWER(name) LIKE ?1 OR LOWER(COALESCE(description, '')) LIKE ?1
         ORDER BY name",
    ))?;

    let projects = stmt
        .query_map(params![pattern], |row| Ok(row_to_project(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

/// Substring search over name only, as used by quick search.
pub fn search_by_name(conn: &Connection, query: &str) -> CrmResult<Vec<Project>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE LOWER(name) LIKE ?1 ORDER BY name",
    ))?;

    let projects = stmt
        .query_map(params![pattern], |row| Ok(row_to_project(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(projects)
}

// --- Relationships (contacts on a project) ---

/// Get-or-create semantics: inserting an existing pair is a no-op.
pub fn ensure_relationship(
    conn: &Connection,
    project_id: Id<Project>,
    user_id: Id<User>,
) -> CrmResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO project_relationships (project_id, user_id) VALUES (?1, ?2)",
        params![project_id.value.to_string(), user_id.value.to_string()],
    )?;
    Ok(())
}

/// Returns the number of rows removed (0 when no relationship existed).
/// Type tags cascade with the join row.
pub fn delete_relationship(
    conn: &Connection,
    project_id: Id<Project>,
    user_id: Id<User>,
) -> CrmResult<usize> {
    let removed = conn.execute(
        "DELETE FROM project_relationships WHERE project_id = ?1 AND user_id = ?2",
        params![project_id.value.to_string(), user_id.value.to_string()],
    )?;
    Ok(removed)
}

pub fn find_relationship(
    conn: &Connection,
    project_id: Id<Project>,
    user_id: Id<User>,
) -> CrmResult<Option<ProjectRelationship>> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM project_relationships WHERE project_id = ?1 AND user_id = ?2",
        params![project_id.value.to_string(), user_id.value.to_string()],
        |row| row.get(0),
    )?;

    if count == 0 {
        return Ok(None);
    }

    Ok(Some(ProjectRelationship {
        project_id,
        user_id,
        types: find_relationship_types(conn, project_id, user_id)?,
    }))
}

/// Replace the relationship-type tag set on an existing join row.
pub fn set_relationship_types(
    conn: &Connection,
    project_id: Id<Project>,
    user_id: Id<User>,
    types: &[String],
) -> CrmResult<()> {
    conn.execute(
        "DELETE FROM project_relationship_types WHERE project_id = ?1 AND user_id = ?2",
        params![project_id.value.to_string(), user_id.value.to_string()],
    )?;

    for relationship_type in types {
        conn.execute(
            "INSERT INTO project_relationship_types (project_id, user_id, type) VALUES (?1, ?2, ?3)",
            params![
                project_id.value.to_string(),
                user_id.value.to_string(),
                relationship_type,
            ],
        )?;
    }

    Ok(())
}

pub fn find_relationships(
    conn: &Connection,
    project_id: Id<Project>,
) -> CrmResult<Vec<(ProjectRelationship, User)>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.first_name, u.last_name, u.email FROM users u
         JOIN project_relationships pr ON pr.user_id = u.id
         WHERE pr.project_id = ?1
         ORDER BY u.last_name, u.first_name",
    )?;

    let users = stmt
        .query_map(params![project_id.value.to_string()], |row| {
            Ok(user_repo::row_to_user(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<User>, _>>()?;

    let mut relationships = Vec::new();
    for user in users {
        let types = find_relationship_types(conn, project_id, user.id)?;
        relationships.push((
            ProjectRelationship {
                project_id,
                user_id: user.id,
                types,
            },
            user,
        ));
    }

    Ok(relationships)
}

pub fn find_contacts(conn: &Connection, project_id: Id<Project>) -> CrmResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.first_name, u.last_name, u.email FROM users u
         JOIN project_relationships pr ON pr.user_id = u.id
         WHERE pr.project_id = ?1
         ORDER BY u.last_name, u.first_name",
    )?;

    let users = stmt
        .query_map(params![project_id.value.to_string()], |row| {
            Ok(user_repo::row_to_user(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(users)
}

fn find_relationship_types(
    conn: &Connection,
    project_id: Id<Project>,
    user_id: Id<User>,
) -> CrmResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT type FROM project_relationship_types
         WHERE project_id = ?1 AND user_id = ?2 ORDER BY type",
    )?;

    let types = stmt
        .query_map(
            params![project_id.value.to_string(), user_id.value.to_string()],
            |row| row.get(0),
        )?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(types)
}

fn row_to_project(row: &rusqlite::Row) -> CrmResult<Project> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;
    let business_id_str: String = row.get(1).map_err(rusqlite::Error::from)?;
    let kind_str: String = row.get(3).map_err(rusqlite::Error::from)?;
    let status_str: String = row.get(4).map_err(rusqlite::Error::from)?;
    let point_person_str: String = row.get(6).map_err(rusqlite::Error::from)?;

    Ok(Project {
        id: Id::new(
            Uuid::parse_str(&id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        business_id: Id::new(
            Uuid::parse_str(&business_id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        name: row.get(2).map_err(rusqlite::Error::from)?,
        kind: ProjectKind::from_db_str(&kind_str)
            .ok_or_else(|| CrmError::Other(format!("Unknown project kind: {}", kind_str)))?,
        status: ProjectStatus::from_db_str(&status_str)
            .ok_or_else(|| CrmError::Other(format!("Unknown project status: {}", status_str)))?,
        description: row.get(5).map_err(rusqlite::Error::from)?,
        point_person_id: Id::new(
            Uuid::parse_str(&point_person_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        tracking_ref: row.get(7).map_err(rusqlite::Error::from)?,
    })
}
