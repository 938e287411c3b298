use rusqlite::Connection;

use crate::error::CrmResult;

/// Initialize the database schema. Creates all tables if they don't exist.
pub fn initialize(conn: &Connection) -> CrmResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            notes TEXT,
            picture TEXT
        );

        CREATE TABLE IF NOT EXISTS phones (
            id TEXT PRIMARY KEY NOT NULL,
            profile_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            type TEXT NOT NULL,
            number TEXT NOT NULL,
            UNIQUE(profile_id, type)
        );

        CREATE TABLE IF NOT EXISTS businesses (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS business_type_tags (
            business_id TEXT NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            PRIMARY KEY (business_id, tag)
        );

        CREATE TABLE IF NOT EXISTS addresses (
            business_id TEXT PRIMARY KEY NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
            street TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            zip TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS business_contacts (
            business_id TEXT NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (business_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY NOT NULL,
            business_id TEXT NOT NULL REFERENCES businesses(id),
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            status TEXT NOT NULL,
            description TEXT,
            point_person_id TEXT NOT NULL REFERENCES users(id),
            tracking_ref TEXT
        );

        CREATE TABLE IF NOT EXISTS project_relationships (
            project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (project_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS project_relationship_types (
            project_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            type TEXT NOT NULL,
            PRIMARY KEY (project_id, user_id, type),
            FOREIGN KEY (project_id, user_id)
                REFERENCES project_relationships(project_id, user_id)
                ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS interactions (
            id TEXT PRIMARY KEY NOT NULL,
            date TEXT NOT NULL,
            kind TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            memo TEXT,
            project_id TEXT REFERENCES projects(id),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS interaction_contacts (
            interaction_id TEXT NOT NULL REFERENCES interactions(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (interaction_id, user_id)
        );

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
