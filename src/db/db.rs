use super::migrations::init_with_migrations;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

pub const DB_FILE_NAME: &str = "lifedash.db";

/// A migrated SQLite connection.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database configured in `config.json`, falling back to
    /// `lifedash.db` in the data directory.
    pub fn new() -> Result<Db> {
        let config = Config::read()?;
        match config.database.and_then(|d| d.path) {
            Some(path) => Self::open(path),
            None => Self::open(DataStorage::new().get_path(DB_FILE_NAME)?),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let mut conn = Connection::open(path).with_context(|| Message::DbConnectionFailed.to_string())?;
        conn.pragma_update(None, "foreign_keys", true)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Opens the file without applying migrations. Used by migration tests.
    pub fn open_without_migrations(path: impl AsRef<Path>) -> Result<Connection> {
        Ok(Connection::open(path)?)
    }

    pub fn into_shared(self) -> Database {
        Database {
            conn: Arc::new(Mutex::new(self.conn)),
        }
    }
}

/// Cloneable handle to one connection, shared by request handlers.
///
/// `rusqlite::Connection` is `Send` but not `Sync`; every access goes
/// through the mutex.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let conn = self.conn.lock();
        f(&conn)
    }
}
