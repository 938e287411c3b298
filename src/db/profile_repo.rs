use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{CrmError, CrmResult};
use crate::model::{Id, Phone, PhoneType, Profile, User};

const PROFILE_USER_COLUMNS: &str =
    "p.id, p.user_id, p.notes, p.picture, u.id, u.first_name, u.last_name, u.email";

pub fn insert(conn: &Connection, profile: &Profile) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO profiles (id, user_id, notes, picture) VALUES (?1, ?2, ?3, ?4)",
        params![
            profile.id.value.to_string(),
            profile.user_id.value.to_string(),
            profile.notes,
            profile.picture,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, profile: &Profile) -> CrmResult<()> {
    conn.execute(
        "UPDATE profiles SET notes = ?1, picture = ?2 WHERE id = ?3",
        params![profile.notes, profile.picture, profile.id.value.to_string()],
    )?;
    Ok(())
}

pub fn find_with_user(
    conn: &Connection,
    profile_id: Id<Profile>,
) -> CrmResult<Option<(Profile, User)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFILE_USER_COLUMNS} FROM profiles p
         JOIN users u ON p.user_id = u.id WHERE p.id = ?1",
    ))?;

    let result = stmt.query_row(params![profile_id.value.to_string()], |row| {
        Ok(row_to_profile_user(row))
    });

    match result {
        Ok(pair) => Ok(Some(pair?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_user(conn: &Connection, user_id: Id<User>) -> CrmResult<Option<Profile>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, notes, picture FROM profiles WHERE user_id = ?1",
    )?;

    let result = stmt.query_row(params![user_id.value.to_string()], |row| {
        Ok(row_to_profile(row))
    });

    match result {
        Ok(profile) => Ok(Some(profile?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all_with_users(conn: &Connection) -> CrmResult<Vec<(Profile, User)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFILE_USER_COLUMNS} FROM profiles p
         JOIN users u ON p.user_id = u.id
         ORDER BY u.last_name, u.first_name",
    ))?;

    let pairs = stmt
        .query_map([], |row| Ok(row_to_profile_user(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(pairs)
}

/// Substring search over first and last name, as used by the full-page
/// people list.
pub fn search_by_name(conn: &Connection, query: &str) -> CrmResult<Vec<(Profile, User)>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFILE_USER_COLUMNS} FROM profiles p
         JOIN users u ON p.user_id = u.id
         WHERE LOWER(u.first_name) LIKE ?1 OR LOWER(u.last_name) LIKE ?1
         ORDER BY u.last_name, u.first_name",
    ))?;

    let pairs = stmt
        .query_map(params![pattern], |row| Ok(row_to_profile_user(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(pairs)
}

/// Substring search over first name, last name, and email, as used by the
/// quick-search and quick-add endpoints.
pub fn search_any(conn: &Connection, query: &str) -> CrmResult<Vec<(Profile, User)>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROFILE_USER_COLUMNS} FROM profiles p
         JOIN users u ON p.user_id = u.id
         WHERE LOWER(u.first_name) LIKE ?1
            OR LOWER(u.last_name) LIKE ?1
            OR LOWER(u.email) LIKE ?1
         ORDER BY u.last_name, u.first_name",
    ))?;

    let pairs = stmt
        .query_map(params![pattern], |row| Ok(row_to_profile_user(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(pairs)
}

// --- Phones ---

/// Insert or replace the number stored in this profile's slot for the
/// phone's type. At most one phone per (profile, type).
pub fn upsert_phone(conn: &Connection, phone: &Phone) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO phones (id, profile_id, type, number) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(profile_id, type) DO UPDATE SET number = excluded.number",
        params![
            phone.id.value.to_string(),
            phone.profile_id.value.to_string(),
            phone.phone_type.to_db_str(),
            phone.number,
        ],
    )?;
    Ok(())
}

pub fn delete_phone(
    conn: &Connection,
    profile_id: Id<Profile>,
    phone_type: PhoneType,
) -> CrmResult<()> {
    conn.execute(
        "DELETE FROM phones WHERE profile_id = ?1 AND type = ?2",
        params![profile_id.value.to_string(), phone_type.to_db_str()],
    )?;
    Ok(())
}

pub fn find_phones(conn: &Connection, profile_id: Id<Profile>) -> CrmResult<Vec<Phone>> {
    let mut stmt = conn.prepare(
        "SELECT id, profile_id, type, number FROM phones WHERE profile_id = ?1 ORDER BY type",
    )?;

    let phones = stmt
        .query_map(params![profile_id.value.to_string()], |row| {
            Ok(row_to_phone(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(phones)
}

pub fn find_phone(
    conn: &Connection,
    profile_id: Id<Profile>,
    phone_type: PhoneType,
) -> CrmResult<Option<Phone>> {
    let mut stmt = conn.prepare(
        "SELECT id, profile_id, type, number FROM phones WHERE profile_id = ?1 AND type = ?2",
    )?;

    let result = stmt.query_row(
        params![profile_id.value.to_string(), phone_type.to_db_str()],
        |row| Ok(row_to_phone(row)),
    );

    match result {
        Ok(phone) => Ok(Some(phone?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_to_profile(row: &rusqlite::Row) -> CrmResult<Profile> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;
    let user_id_str: String = row.get(1).map_err(rusqlite::Error::from)?;

    Ok(Profile {
        id: Id::new(
            Uuid::parse_str(&id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        user_id: Id::new(
            Uuid::parse_str(&user_id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        notes: row.get(2).map_err(rusqlite::Error::from)?,
        picture: row.get(3).map_err(rusqlite::Error::from)?,
    })
}

fn row_to_profile_user(row: &rusqlite::Row) -> CrmResult<(Profile, User)> {
    let profile = row_to_profile(row)?;
    let user_id_str: String = row.get(4).map_err(rusqlite::Error::from)?;

    let user = User {
        id: Id::new(
            Uuid::parse_str(&user_id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        first_name: row.get(5).map_err(rusqlite::Error::from)?,
        last_name: row.get(6).map_err(rusqlite::Error::from)?,
        email: row.get(7).map_err(rusqlite::Error::from)?,
    };

    Ok((profile, user))
}

fn row_to_phone(row: &rusqlite::Row) -> CrmResult<Phone> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;
    let profile_id_str: String = row.get(1).map_err(rusqlite::Error::from)?;
    let type_str: String = row.get(2).map_err(rusqlite::Error::from)?;

    Ok(Phone {
        id: Id::new(
            Uuid::parse_str(&id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        profile_id: Id::new(
            Uuid::parse_str(&profile_id_str)
                .map_err(|e| CrmError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        phone_type: PhoneType::from_db_str(&type_str)
            .ok_or_else(|| CrmError::Other(format!("Unknown phone type: {}", type_str)))?,
        number: row.get(3).map_err(rusqlite::Error::from)?,
    })
}
