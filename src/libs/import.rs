//! Import of an export bundle into a user's account.
//!
//! Import is best-effort per record: a malformed record or a failed insert is
//! counted and described in the report, and the importer moves on to the
//! next record. Only a payload that is not a JSON object at all is rejected
//! up front.
//!
//! Nothing is deduplicated; importing the same bundle twice creates every
//! record twice.

use crate::db::records::RecordStore;
use crate::libs::module::Module;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Top-level key holding bundle metadata; never imported.
pub const METADATA_KEY: &str = "metadata";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("import payload must be a JSON object keyed by module name")]
    NotAnObject,
}

/// Outcome for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleImportResult {
    pub created: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl ModuleImportResult {
    fn record_failure(&mut self, reason: String) {
        self.failed += 1;
        self.errors.push(reason);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Only modules present in the payload appear here.
    pub results: BTreeMap<Module, ModuleImportResult>,
    pub total_created: usize,
    pub total_failed: usize,
}

impl ImportReport {
    pub fn get(&self, module: Module) -> Option<&ModuleImportResult> {
        self.results.get(&module)
    }
}

pub struct Importer<'a, 'c> {
    store: &'a RecordStore<'c>,
}

impl<'a, 'c> Importer<'a, 'c> {
    pub fn new(store: &'a RecordStore<'c>) -> Self {
        Self { store }
    }

    pub fn import(&self, user_id: &str, payload: &Value) -> Result<ImportReport, ImportError> {
        self.import_at(user_id, payload, Utc::now())
    }

    /// Imports `payload` for `user_id`; `now` fills missing `createdAt` values.
    ///
    /// Modules are processed in canonical order, records in payload order.
    pub fn import_at(&self, user_id: &str, payload: &Value, now: DateTime<Utc>) -> Result<ImportReport, ImportError> {
        let object = payload.as_object().ok_or(ImportError::NotAnObject)?;

        let mut present = Vec::new();
        for (key, value) in object {
            if key == METADATA_KEY {
                continue;
            }
            match Module::from_wire_name(key) {
                Some(module) => present.push((module, value)),
                None => warn!(key = %key, "skipping unknown module in import payload"),
            }
        }
        present.sort_by_key(|(module, _)| *module);

        let mut report = ImportReport::default();
        for (module, value) in present {
            let result = report.results.entry(module).or_default();

            let Some(records) = value.as_array() else {
                result.record_failure(format!("expected an array of {} records", module));
                continue;
            };

            for (index, raw) in records.iter().enumerate() {
                match self.store.insert(module, user_id, raw, &now) {
                    Ok(id) => {
                        debug!(module = %module, id, "imported record");
                        result.created += 1;
                    }
                    Err(e) => {
                        warn!(module = %module, index, error = %e, "failed to import record");
                        result.record_failure(format!("record {}: {}", index, e));
                    }
                }
            }
        }

        report.total_created = report.results.values().map(|r| r.created).sum();
        report.total_failed = report.results.values().map(|r| r.failed).sum();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::db::Db;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object_payload() {
        let db = Db::open_in_memory().unwrap();
        let store = RecordStore::new(&db.conn);
        assert_eq!(Importer::new(&store).import("u1", &json!([1, 2])).unwrap_err(), ImportError::NotAnObject);
    }

    #[test]
    fn test_skips_metadata_and_unknown_keys() {
        let db = Db::open_in_memory().unwrap();
        let store = RecordStore::new(&db.conn);
        let payload = json!({
            "metadata": {"userId": "someone"},
            "recipes": [{"name": "soup"}],
            "quickNotes": [{"content": "hi"}]
        });

        let report = Importer::new(&store).import("u1", &payload).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.get(Module::QuickNotes).unwrap().created, 1);
        assert_eq!(report.total_created, 1);
    }

    #[test]
    fn test_keys_must_be_exact_wire_names() {
        let db = Db::open_in_memory().unwrap();
        let store = RecordStore::new(&db.conn);
        let payload = json!({
            "quickNotes": [{"content": "kept"}],
            "quick_notes": [{"content": "alias"}, {"color": "red"}],
            "Health": [{"date": "2026-01-01"}]
        });

        let report = Importer::new(&store).import("u1", &payload).unwrap();
        assert_eq!(report.results.len(), 1);
        let notes = report.get(Module::QuickNotes).unwrap();
        assert_eq!((notes.created, notes.failed), (1, 0));
        assert_eq!(store.count(Module::Health, "u1").unwrap(), 0);
    }

    #[test]
    fn test_non_array_module_counts_as_failure() {
        let db = Db::open_in_memory().unwrap();
        let store = RecordStore::new(&db.conn);
        let report = Importer::new(&store).import("u1", &json!({"health": {"date": "2026-01-01"}})).unwrap();

        let health = report.get(Module::Health).unwrap();
        assert_eq!((health.created, health.failed), (0, 1));
        assert_eq!(health.errors, vec!["expected an array of health records".to_string()]);
    }
}
