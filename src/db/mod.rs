//! SQLite persistence layer.
//!
//! - [`db`]: connection setup and the shared [`db::Database`] handle
//! - [`migrations`]: versioned schema changes
//! - [`records`]: schema-driven storage for every dashboard module
//! - [`users`]: accounts and API tokens
//!
//! ```rust
//! use lifedash::db::{db::Db, records::RecordStore};
//! use lifedash::libs::module::Module;
//!
//! let db = Db::open_in_memory().unwrap();
//! let store = RecordStore::new(&db.conn);
//! assert_eq!(store.count(Module::Health, "u1").unwrap(), 0);
//! ```

/// Connection management.
pub mod db;

/// Database schema migration system.
pub mod migrations;

/// Per-module record storage.
pub mod records;

/// Users and session tokens.
pub mod users;
