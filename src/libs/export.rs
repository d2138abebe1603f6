//! Export of a user's records across dashboard modules.
//!
//! The exporter gathers every selected module into an [`ExportBundle`] and
//! renders it as JSON, CSV or Markdown.
//!
//! ## Failure model
//!
//! Export is fail-fast: a storage error in any module aborts the whole
//! export and no partial bundle is returned.
//!
//! ## Usage
//!
//! ```rust
//! use lifedash::db::{db::Db, records::RecordStore};
//! use lifedash::libs::export::{ExportFormat, ExportOptions, Exporter};
//! use lifedash::libs::module::Module;
//!
//! let db = Db::open_in_memory().unwrap();
//! let store = RecordStore::new(&db.conn);
//! let options = ExportOptions {
//!     format: ExportFormat::Csv,
//!     modules: vec![Module::Health],
//!     date_range: None,
//! };
//! let output = Exporter::new(options).export(&store, "u1").unwrap();
//! assert!(output.file_name.ends_with(".csv"));
//! ```

use crate::db::records::{RecordStore, StoreError};
use crate::libs::bundle::{DateRange, ExportBundle, ExportFilters, ExportMetadata, BUNDLE_VERSION};
use crate::libs::formatter::{render_csv, render_markdown};
use crate::libs::module::Module;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Output formats for an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The bundle itself, pretty-printed. Importable.
    #[default]
    Json,

    /// One CSV section per module.
    Csv,

    /// Human-readable document with one table per module.
    #[value(alias = "md")]
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown export format '{0}' (expected json, csv or markdown)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "markdown",
        })
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read {module}: {source}")]
    Store {
        module: Module,
        #[source]
        source: StoreError,
    },

    #[error("failed to render CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize bundle: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Empty means every module.
    pub modules: Vec<Module>,
    pub date_range: Option<DateRange>,
}

impl ExportOptions {
    /// Selected modules in canonical order, without duplicates.
    pub fn selected_modules(&self) -> Vec<Module> {
        if self.modules.is_empty() {
            return Module::ALL.to_vec();
        }
        let mut modules = self.modules.clone();
        modules.sort();
        modules.dedup();
        modules
    }
}

/// A rendered export, ready to be written to disk or sent over HTTP.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub file_name: String,
    pub body: String,
}

impl ExportOutput {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// `lifedash-export-20261019-143022.csv`
pub fn export_file_name(format: ExportFormat, exported_at: &DateTime<Utc>) -> String {
    format!("lifedash-export-{}.{}", exported_at.format("%Y%m%d-%H%M%S"), format.extension())
}

pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Collects the bundle for `user_id`.
    pub fn collect(&self, store: &RecordStore, user_id: &str) -> Result<ExportBundle, ExportError> {
        self.collect_at(store, user_id, Utc::now())
    }

    /// Like [`collect`](Self::collect) with a fixed export timestamp.
    pub fn collect_at(&self, store: &RecordStore, user_id: &str, exported_at: DateTime<Utc>) -> Result<ExportBundle, ExportError> {
        let selected = self.options.selected_modules();
        let range = self.options.date_range.as_ref();

        let mut modules = BTreeMap::new();
        for module in &selected {
            let records = store
                .fetch(*module, user_id, range)
                .map_err(|source| ExportError::Store { module: *module, source })?;
            debug!(module = %module, count = records.len(), "fetched module records");
            modules.insert(*module, records);
        }

        Ok(ExportBundle {
            metadata: ExportMetadata {
                exported_at,
                user_id: user_id.to_string(),
                version: BUNDLE_VERSION,
                filters: ExportFilters {
                    modules: selected,
                    date_range: self.options.date_range,
                },
            },
            modules,
        })
    }

    /// Collects and renders the bundle in the configured format.
    pub fn export(&self, store: &RecordStore, user_id: &str) -> Result<ExportOutput, ExportError> {
        let bundle = self.collect(store, user_id)?;
        self.render(&bundle)
    }

    pub fn render(&self, bundle: &ExportBundle) -> Result<ExportOutput, ExportError> {
        let format = self.options.format;
        let body = match format {
            ExportFormat::Json => serde_json::to_string_pretty(bundle)?,
            ExportFormat::Csv => render_csv(bundle)?,
            ExportFormat::Markdown => render_markdown(bundle),
        };

        Ok(ExportOutput {
            format,
            file_name: export_file_name(format, &bundle.metadata.exported_at),
            body,
        })
    }
}
