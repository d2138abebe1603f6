//! # Lifedash - personal dashboard data export and import
//!
//! Moves a user's life-dashboard records (blog posts, bookmarks, health
//! entries, projects, trades, social posts and quick notes) in and out of
//! the dashboard's SQLite store.
//!
//! ## Features
//!
//! - **Export**: one bundle across any subset of modules, filtered by an
//!   inclusive date range, rendered as JSON, CSV or Markdown
//! - **Import**: best-effort per record, with a per-module report of what
//!   was created and what failed
//! - **HTTP API**: `GET /export` and `POST /import` behind token auth
//! - **CLI**: the same pipeline from the terminal, plus user and token management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifedash::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
