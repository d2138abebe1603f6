//! Schema-driven storage for module records.
//!
//! One store serves every module: SQL is assembled from the module's
//! [`ModuleSchema`](crate::libs::module::ModuleSchema), so there is no
//! per-module query code. Rows come back in insertion order (`ORDER BY id`).

use crate::libs::bundle::DateRange;
use crate::libs::module::{FieldKind, Module};
use crate::libs::record::{normalize_record, Record, RecordError};
use chrono::{DateTime, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("unexpected value in {table}.{column}")]
    UnexpectedValue { table: &'static str, column: &'static str },
}

pub struct RecordStore<'c> {
    conn: &'c Connection,
}

impl<'c> RecordStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Returns `user_id`'s records of `module`, oldest first.
    ///
    /// With a range, only rows whose date field lies within it (both bounds
    /// inclusive) are returned. Rows with a NULL date field never match a
    /// range.
    pub fn fetch(&self, module: Module, user_id: &str, range: Option<&DateRange>) -> Result<Vec<Record>, StoreError> {
        let schema = module.schema();
        let columns: Vec<&str> = schema.fields.iter().map(|f| f.column).collect();

        let mut sql = format!("SELECT id, {} FROM {} WHERE user_id = ?", columns.join(", "), schema.table);
        let mut params: Vec<SqlValue> = vec![SqlValue::Text(user_id.to_string())];

        if let Some(range) = range {
            let date_column = schema.date_spec().column;
            let (start, end) = range.bounds_for(schema.date_spec());
            if let Some(start) = start {
                sql.push_str(&format!(" AND {} >= ?", date_column));
                params.push(SqlValue::Text(start));
            }
            if let Some(end) = end {
                sql.push_str(&format!(" AND {} <= ?", date_column));
                params.push(SqlValue::Text(end));
            }
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            record.insert("id".to_string(), Value::from(row.get::<_, i64>(0)?));
            for (i, field) in schema.fields.iter().enumerate() {
                let value = match (row.get_ref(i + 1)?, field.kind) {
                    (ValueRef::Null, _) => Value::Null,
                    (ValueRef::Integer(n), FieldKind::Bool) => Value::Bool(n != 0),
                    (ValueRef::Integer(n), FieldKind::Real) => Value::from(n as f64),
                    (ValueRef::Integer(n), _) => Value::from(n),
                    (ValueRef::Real(r), _) => Number::from_f64(r).map(Value::Number).unwrap_or(Value::Null),
                    (ValueRef::Text(t), _) => Value::String(String::from_utf8_lossy(t).into_owned()),
                    (ValueRef::Blob(_), _) => {
                        return Err(StoreError::UnexpectedValue {
                            table: schema.table,
                            column: field.column,
                        })
                    }
                };
                record.insert(field.name.to_string(), value);
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Validates `raw` against the module schema and stores it for `user_id`.
    ///
    /// Returns the new row id.
    pub fn insert(&self, module: Module, user_id: &str, raw: &Value, now: &DateTime<Utc>) -> Result<i64, RecordError> {
        let schema = module.schema();
        let values = normalize_record(schema, raw, now)?;

        let columns: Vec<&str> = values.iter().map(|(f, _)| f.column).collect();
        let placeholders = vec!["?"; values.len() + 1].join(", ");
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES ({})",
            schema.table,
            columns.join(", "),
            placeholders
        );

        let params = std::iter::once(SqlValue::Text(user_id.to_string())).chain(values.into_iter().map(|(_, v)| to_sql(v)));
        self.conn.execute(&sql, params_from_iter(params))?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn count(&self, module: Module, user_id: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?1", module.schema().table);
        let count: i64 = self.conn.query_row(&sql, [user_id], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Normalized JSON scalars map one-to-one onto SQLite values.
fn to_sql(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s),
        other => SqlValue::Text(other.to_string()),
    }
}
