//! Core library modules for lifedash.
//!
//! - **Domain**: [`module`] (the module registry), [`record`], [`bundle`]
//! - **Pipeline**: [`export`], [`formatter`] (CSV/Markdown renderers), [`import`]
//! - **Infrastructure**: [`config`], [`data_storage`], [`messages`], [`view`]
//!
//! ## Usage
//!
//! ```rust
//! use lifedash::db::{db::Db, records::RecordStore};
//! use lifedash::libs::export::{ExportOptions, Exporter};
//! use lifedash::libs::import::Importer;
//!
//! let db = Db::open_in_memory().unwrap();
//! let store = RecordStore::new(&db.conn);
//! let bundle = Exporter::new(ExportOptions::default()).collect(&store, "alice").unwrap();
//! let payload = serde_json::to_value(&bundle).unwrap();
//! let report = Importer::new(&store).import("bob", &payload).unwrap();
//! assert_eq!(report.total_failed, 0);
//! ```

pub mod bundle;
pub mod config;
pub mod data_storage;
pub mod export;
pub mod formatter;
pub mod import;
pub mod messages;
pub mod module;
pub mod record;
pub mod view;
