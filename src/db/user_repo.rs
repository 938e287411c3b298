use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{CrmError, CrmResult};
use crate::model::{Id, User};

pub fn insert(conn: &Connection, user: &User) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO users (id, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4)",
        params![
            user.id.value.to_string(),
            user.first_name,
            user.last_name,
            user.email,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, user: &User) -> CrmResult<()> {
    conn.execute(
        "UPDATE users SET first_name = ?1, last_name = ?2, email = ?3 WHERE id = ?4",
        params![
            user.first_name,
            user.last_name,
            user.email,
            user.id.value.to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<User>) -> CrmResult<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email FROM users WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.value.to_string()], |row| Ok(row_to_user(row)));

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> CrmResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email FROM users ORDER BY last_name, first_name",
    )?;

    let users = stmt
        .query_map([], |row| Ok(row_to_user(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(users)
}

/// Whether another user already holds this email. Consulted on insert only.
pub fn email_taken(conn: &Connection, email: &str) -> CrmResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1 COLLATE NOCASE",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub(crate) fn row_to_user(row: &rusqlite::Row) -> CrmResult<User> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;

    Ok(User {
        id: Id::new(
            Uuid::parse_str(&id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        first_name: row.get(1).map_err(rusqlite::Error::from)?,
        last_name: row.get(2).map_err(rusqlite::Error::from)?,
        email: row.get(3).map_err(rusqlite::Error::from)?,
    })
}
