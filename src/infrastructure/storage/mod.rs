//! SQLite note storage

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::application::errors::StorageError;
use crate::domain::entities::Note;
use crate::domain::traits::Store;

/// Note store in a single SQLite table
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                name TEXT PRIMARY KEY NOT NULL,
                url TEXT NOT NULL,
                user TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, name: &str) -> Result<Option<Note>, StorageError> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                "SELECT name, url, user FROM notes WHERE name = ?1",
                params![name],
                |row| Ok(Note::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;
        Ok(note)
    }

    async fn save(&self, note: &Note) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO notes (name, url, user) VALUES (?1, ?2, ?3)",
            params![note.name, note.url, note.user],
        )?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM notes WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }

    async fn all(&self) -> Result<Vec<Note>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name, url, user FROM notes ORDER BY name")?;
        let notes = stmt
            .query_map([], |row| {
                Ok(Note::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }
}
