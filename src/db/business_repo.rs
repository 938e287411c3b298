use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{CrmError, CrmResult};
use crate::model::{Address, Business, Id, User};

pub fn insert(conn: &Connection, business: &Business) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO businesses (id, name, notes) VALUES (?1, ?2, ?3)",
        params![
            business.id.value.to_string(),
            business.name,
            business.notes,
        ],
    )?;
    replace_type_tags(conn, business)?;
    Ok(())
}

pub fn update(conn: &Connection, business: &Business) -> CrmResult<()> {
    conn.execute(
        "UPDATE businesses SET name = ?1, notes = ?2 WHERE id = ?3",
        params![
            business.name,
            business.notes,
            business.id.value.to_string(),
        ],
    )?;
    replace_type_tags(conn, business)?;
    Ok(())
}

fn replace_type_tags(conn: &Connection, business: &Business) -> CrmResult<()> {
    conn.execute(
        "DELETE FROM business_type_tags WHERE business_id = ?1",
        params![business.id.value.to_string()],
    )?;

    for tag in &business.business_types {
        conn.execute(
            "INSERT INTO business_type_tags (business_id, tag) VALUES (?1, ?2)",
            params![business.id.value.to_string(), tag],
        )?;
    }

    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Business>) -> CrmResult<Option<Business>> {
    let mut stmt = conn.prepare("SELECT id, name, notes FROM businesses WHERE id = ?1")?;

    let result = stmt.query_row(params![id.value.to_string()], |row| {
        let id_str: String = row.get(0)?;
        let name: String = row.get(1)?;
        let notes: Option<String> = row.get(2)?;
        Ok((id_str, name, notes))
    });

    match result {
        Ok((id_str, name, notes)) => {
            let id = Id::new(
                Uuid::parse_str(&id_str)
                    .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
            );
            Ok(Some(Business {
                id,
                name,
                notes,
                business_types: find_type_tags(conn, id)?,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> CrmResult<Vec<Business>> {
    let mut stmt = conn.prepare("SELECT id, name, notes FROM businesses ORDER BY name")?;
    let rows: Vec<(String, String, Option<String>)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    rows_to_businesses(conn, rows)
}

/// Substring search over name and notes.
pub fn search(conn: &Connection, query: &str) -> CrmResult<Vec<Business>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(
        "SELECT id, name, notes FROM businesses
         WHERE LOWER(name) LIKE ?1 OR LOWER(COALESCE(notes, '')) LIKE ?1
         ORDER BY name",
    )?;
    let rows: Vec<(String, String, Option<String>)> = stmt
        .query_map(params![pattern], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows_to_businesses(conn, rows)
}

/// Substring search over name only, as used by quick search.
pub fn search_by_name(conn: &Connection, query: &str) -> CrmResult<Vec<Business>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(
        "SELECT id, name, notes FROM businesses WHERE LOWER(name) LIKE ?1 ORDER BY name",
    )?;
    let rows: Vec<(String, String, Option<String>)> = stmt
        .query_map(params![pattern], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows_to_businesses(conn, rows)
}

fn rows_to_businesses(
    conn: &Connection,
    rows: Vec<(String, String, Option<String>)>,
) -> CrmResult<Vec<Business>> {
    let mut businesses = Vec::new();
    for (id_str, name, notes) in rows {
        let id = Id::new(
            Uuid::parse_str(&id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        );
        businesses.push(Business {
            id,
            name,
            notes,
            business_types: find_type_tags(conn, id)?,
        });
    }
    Ok(businesses)
}

fn find_type_tags(conn: &Connection, business_id: Id<Business>) -> CrmResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag FROM business_type_tags WHERE business_id = ?1 ORDER BY tag",
    )?;

    let tags = stmt
        .query_map(params![business_id.value.to_string()], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(tags)
}

// --- Address ---

pub fn upsert_address(
    conn: &Connection,
    business_id: Id<Business>,
    address: &Address,
) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO addresses (business_id, street, city, state, zip)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(business_id) DO UPDATE SET
             street = excluded.street,
             city = excluded.city,
             state = excluded.state,
             zip = excluded.zip",
        params![
            business_id.value.to_string(),
            address.street,
            address.city,
            address.state,
            address.zip,
        ],
    )?;
    Ok(())
}

pub fn find_address(conn: &Connection, business_id: Id<Business>) -> CrmResult<Option<Address>> {
    let mut stmt = conn.prepare(
        "SELECT street, city, state, zip FROM addresses WHERE business_id = ?1",
    )?;

    let result = stmt.query_row(params![business_id.value.to_string()], |row| {
        Ok(Address {
            street: row.get(0)?,
            city: row.get(1)?,
            state: row.get(2)?,
            zip: row.get(3)?,
        })
    });

    match result {
        Ok(address) => Ok(Some(address)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// --- Contacts (many-to-many) ---

/// Idempotent: adding an existing contact is a no-op.
pub fn add_contact(conn: &Connection, business_id: Id<Business>, user_id: Id<User>) -> CrmResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO business_contacts (business_id, user_id) VALUES (?1, ?2)",
        params![business_id.value.to_string(), user_id.value.to_string()],
    )?;
    Ok(())
}

/// Returns the number of rows removed (0 when no membership existed).
pub fn remove_contact(
    conn: &Connection,
    business_id: Id<Business>,
    user_id: Id<User>,
) -> CrmResult<usize> {
    let removed = conn.execute(
        "DELETE FROM business_contacts WHERE business_id = ?1 AND user_id = ?2",
        params![business_id.value.to_string(), user_id.value.to_string()],
    )?;
    Ok(removed)
}

pub fn find_contacts(conn: &Connection, business_id: Id<Business>) -> CrmResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.first_name, u.last_name, u.email FROM users u
         JOIN business_contacts bc ON bc.user_id = u.id
         WHERE bc.business_id = ?1
         ORDER BY u.last_name, u.first_name",
    )?;

    let users = stmt
        .query_map(params![business_id.value.to_string()], |row| {
            Ok(user_repo::row_to_user(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(users)
}
