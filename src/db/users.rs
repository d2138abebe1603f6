use crate::libs::record::format_timestamp;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use uuid::Uuid;

const INSERT_USER: &str = "INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)";
const SELECT_USERS: &str = "SELECT id, name, created_at FROM users ORDER BY created_at, id";
const SELECT_USER_BY_ID: &str = "SELECT id, name, created_at FROM users WHERE id = ?1";
const INSERT_SESSION: &str = "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)";
const SELECT_SESSION_USER: &str = "SELECT user_id FROM sessions WHERE token = ?1";
const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = ?1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// Accounts and their API tokens.
pub struct Users<'c> {
    conn: &'c Connection,
}

impl<'c> Users<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Creates a user with a fresh random id.
    pub fn create(&self, name: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: format_timestamp(&Utc::now()),
        };
        self.conn.execute(INSERT_USER, params![user.id, user.name, user.created_at])?;
        Ok(user)
    }

    pub fn get(&self, id: &str) -> Result<Option<User>> {
        self.conn
            .query_row(SELECT_USER_BY_ID, params![id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(SELECT_USERS)?;
        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Issues a new bearer token for `user_id`. Fails if the user does not exist.
    pub fn issue_token(&self, user_id: &str) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.conn
            .execute(INSERT_SESSION, params![token, user_id, format_timestamp(&Utc::now())])?;
        Ok(token)
    }

    pub fn resolve_token(&self, token: &str) -> Result<Option<String>> {
        self.conn
            .query_row(SELECT_SESSION_USER, params![token], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    /// Returns `true` if a token was removed.
    pub fn revoke_token(&self, token: &str) -> Result<bool> {
        Ok(self.conn.execute(DELETE_SESSION, params![token])? > 0)
    }
}
