//! Request authentication.
//!
//! Handlers never look at credentials themselves: they take an [`AuthUser`]
//! argument, which asks the state's [`Authenticator`] to resolve the request
//! to a user id and rejects with 401 otherwise.
//!
//! The bundled [`TokenAuthenticator`] accepts either
//! `Authorization: Bearer <token>` or a `session=<token>` cookie and looks the
//! token up in the `sessions` table. Resolved tokens are cached in memory
//! until [`Authenticator::clear_cache`] is called.

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::db::db::Database;
use crate::db::users::Users;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use thiserror::Error;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid or revoked token")]
    InvalidToken,

    #[error("authentication backend failed: {0}")]
    Backend(anyhow::Error),
}

/// Resolves a request to the id of the user making it.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<String, AuthError>;

    /// Drops any cached credentials.
    fn clear_cache(&self) {}
}

/// Bearer token from `Authorization`, else the `session` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub struct TokenAuthenticator {
    db: Database,
    cache: Mutex<HashMap<String, String>>,
}

impl TokenAuthenticator {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_tokens(&self) -> usize {
        self.cache.lock().len()
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let token = extract_token(headers).ok_or(AuthError::MissingCredentials)?;

        if let Some(user_id) = self.cache.lock().get(&token) {
            return Ok(user_id.clone());
        }

        let user_id = self
            .db
            .with_conn(|conn| Users::new(conn).resolve_token(&token))
            .map_err(AuthError::Backend)?
            .ok_or(AuthError::InvalidToken)?;

        self.cache.lock().insert(token, user_id.clone());
        Ok(user_id)
    }

    fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

/// The authenticated caller's user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = state.auth.clone();
        let headers = parts.headers.clone();

        let result = tokio::task::spawn_blocking(move || auth.authenticate(&headers)).await?;
        match result {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                tracing::debug!(error = %e, "rejected request");
                Err(e.into())
            }
        }
    }
}
