//! Module records and value normalization.
//!
//! A [`Record`] is an ordered JSON object mapping field names to scalars.
//! The pipeline never interprets business meaning; it only makes sure every
//! value matches the [`FieldKind`] its schema declares before it reaches
//! storage, and that timestamps share one sortable text format.

use crate::libs::module::{FieldKind, FieldSpec, ModuleSchema};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

pub type Record = Map<String, Value>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a single record could not be imported.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' expects {expected}, got {got}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Formats a timestamp the way every datetime column stores it.
///
/// Fixed-width millisecond precision keeps lexicographic order equal to
/// chronological order, which the date-range filter relies on.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a calendar date; RFC 3339 timestamps contribute their UTC date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|ts| ts.with_timezone(&Utc).date_naive()))
}

/// Parses a timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (both read
/// as UTC) and a bare date (midnight UTC).
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

impl FieldSpec {
    /// Checks `value` against this field's kind and returns its stored form.
    ///
    /// `None` and `null` are both "absent": they fail required fields, become
    /// the current time for `createdAt`, and `Null` otherwise.
    pub fn normalize(&self, value: Option<&Value>, now: &DateTime<Utc>) -> Result<Value, RecordError> {
        let value = match value {
            None | Some(Value::Null) if self.required => return Err(RecordError::MissingField(self.name)),
            None | Some(Value::Null) if self.name == "createdAt" => return Ok(Value::String(format_timestamp(now))),
            None | Some(Value::Null) => return Ok(Value::Null),
            Some(value) => value,
        };

        let invalid = |expected: &'static str| RecordError::InvalidType {
            field: self.name,
            expected,
            got: type_name(value),
        };

        match self.kind {
            FieldKind::Text => value.as_str().map(|s| Value::String(s.to_string())).ok_or_else(|| invalid("a string")),
            FieldKind::Integer => value
                .as_i64()
                .or_else(|| value.as_f64().filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64).map(|n| n as i64))
                .map(Value::from)
                .ok_or_else(|| invalid("an integer")),
            FieldKind::Real => value.as_f64().map(Value::from).ok_or_else(|| invalid("a number")),
            FieldKind::Bool => value.as_bool().map(Value::Bool).ok_or_else(|| invalid("a boolean")),
            FieldKind::Date => value
                .as_str()
                .and_then(parse_date)
                .map(|d| Value::String(format_date(&d)))
                .ok_or_else(|| invalid("a date (YYYY-MM-DD)")),
            FieldKind::DateTime => value
                .as_str()
                .and_then(parse_datetime)
                .map(|ts| Value::String(format_timestamp(&ts)))
                .ok_or_else(|| invalid("a timestamp (RFC 3339)")),
        }
    }
}

/// Validates a raw bundle entry against `schema`.
///
/// Returns the normalized value of every schema field in schema order.
/// Unknown keys, `id` and `userId` are ignored.
pub fn normalize_record(
    schema: &'static ModuleSchema,
    raw: &Value,
    now: &DateTime<Utc>,
) -> Result<Vec<(&'static FieldSpec, Value)>, RecordError> {
    let object = match raw {
        Value::Object(object) => object,
        Value::Null => return Err(RecordError::NotAnObject("null")),
        Value::Bool(_) => return Err(RecordError::NotAnObject("boolean")),
        Value::Number(_) => return Err(RecordError::NotAnObject("number")),
        Value::String(_) => return Err(RecordError::NotAnObject("string")),
        Value::Array(_) => return Err(RecordError::NotAnObject("array")),
    };

    schema
        .fields
        .iter()
        .map(|field| field.normalize(object.get(field.name), now).map(|value| (field, value)))
        .collect()
}
