//! HTTP error mapping.
//!
//! | error | status | body |
//! |---|---|---|
//! | [`ApiError::Validation`] | 400 | `{"error": "Invalid request", "details": [{"field", "message"}]}` |
//! | [`ApiError::Unauthorized`] | 401 | `{"error": "Unauthorized"}` |
//! | [`ApiError::Internal`] | 500 | `{"error": "Internal server error"}` |
//!
//! Internal errors are logged with their cause; the response never carries it.

use crate::api::auth::AuthError;
use crate::libs::export::ExportError;
use crate::libs::import::ImportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl ToString) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0:?}")]
    Validation(Vec<FieldIssue>),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldIssue]>,
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl ToString) -> Self {
        ApiError::Validation(vec![FieldIssue::new(field, message)])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(issues) => ErrorBody {
                error: "Invalid request",
                details: Some(issues.as_slice()),
            },
            ApiError::Unauthorized => ErrorBody {
                error: "Unauthorized",
                details: None,
            },
            ApiError::Internal(e) => {
                tracing::error!(error = %format!("{:#}", e), "request failed");
                ErrorBody {
                    error: "Internal server error",
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Internal(e.into())
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        ApiError::validation("body", e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Backend(e) => ApiError::Internal(e),
            _ => ApiError::Unauthorized,
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Internal(e.into())
    }
}
