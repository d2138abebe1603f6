//! Route handlers.
//!
//! Storage work runs on the blocking pool; handlers only parse input and
//! shape the response.

use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, FieldIssue};
use crate::api::AppState;
use crate::db::records::RecordStore;
use crate::libs::bundle::{DateRange, DateRangeError};
use crate::libs::export::{ExportFormat, ExportOptions, Exporter};
use crate::libs::import::{ImportReport, Importer};
use crate::libs::module::Module;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: Option<String>,
    /// Comma-separated module names.
    pub modules: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ExportQuery {
    /// Validates every parameter, reporting all problems at once.
    pub fn into_options(self) -> Result<ExportOptions, ApiError> {
        let mut issues = Vec::new();

        let format = match self.format.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(raw) => raw.parse::<ExportFormat>().unwrap_or_else(|e| {
                issues.push(FieldIssue::new("format", e));
                ExportFormat::default()
            }),
            None => ExportFormat::default(),
        };

        let modules = match self.modules.as_deref() {
            Some(raw) => Module::parse_list(raw).unwrap_or_else(|e| {
                issues.push(FieldIssue::new("modules", e));
                Vec::new()
            }),
            None => Vec::new(),
        };

        let date_range = DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref()).unwrap_or_else(|e| {
            let field = match &e {
                DateRangeError::InvalidDate(value) if self.start_date.as_deref().map(str::trim) != Some(value.as_str()) => "endDate",
                _ => "startDate",
            };
            issues.push(FieldIssue::new(field, e));
            None
        });

        if !issues.is_empty() {
            return Err(ApiError::Validation(issues));
        }
        Ok(ExportOptions {
            format,
            modules,
            date_range,
        })
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn export_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation("query", e.body_text()))?;
    let exporter = Exporter::new(query.into_options()?);

    let db = state.db.clone();
    let uid = user_id.clone();
    let output = tokio::task::spawn_blocking(move || db.with_conn(|conn| exporter.export(&RecordStore::new(conn), &uid))).await??;

    info!(user = %user_id, format = %output.format, file = %output.file_name, "export served");

    let headers = [
        (header::CONTENT_TYPE, output.content_type().to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", output.file_name)),
    ];
    Ok((headers, output.body).into_response())
}

pub async fn import_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ImportReport>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::validation("body", e.body_text()))?;

    let db = state.db.clone();
    let uid = user_id.clone();
    let report = tokio::task::spawn_blocking(move || db.with_conn(|conn| Importer::new(&RecordStore::new(conn)).import(&uid, &payload)))
        .await??;

    info!(
        user = %user_id,
        created = report.total_created,
        failed = report.total_failed,
        "import finished"
    );
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(format: Option<&str>, modules: Option<&str>, start: Option<&str>, end: Option<&str>) -> ExportQuery {
        ExportQuery {
            format: format.map(String::from),
            modules: modules.map(String::from),
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    fn issue_fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(issues) => issues.into_iter().map(|i| i.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let options = ExportQuery::default().into_options().unwrap();
        assert_eq!(options, ExportOptions::default());
    }

    #[test]
    fn test_parses_all_parameters() {
        let options = query(Some("md"), Some("trading, health"), Some("2026-01-01"), Some("2026-01-31"))
            .into_options()
            .unwrap();
        assert_eq!(options.format, ExportFormat::Markdown);
        assert_eq!(options.modules, vec![Module::Health, Module::Trading]);
        assert!(options.date_range.is_some());
    }

    #[test]
    fn test_collects_every_issue() {
        let err = query(Some("xlsx"), Some("health,recipes"), Some("yesterday"), None)
            .into_options()
            .unwrap_err();
        assert_eq!(issue_fields(err), vec!["format", "modules", "startDate"]);
    }

    #[test]
    fn test_date_issue_fields() {
        let err = query(None, None, Some("2026-01-01"), Some("soon")).into_options().unwrap_err();
        assert_eq!(issue_fields(err), vec!["endDate"]);

        let err = query(None, None, Some("2026-02-01"), Some("2026-01-01")).into_options().unwrap_err();
        assert_eq!(issue_fields(err), vec!["startDate"]);
    }
}
