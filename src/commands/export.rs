//! Writes a user's data to an export file.
//!
//! Uses the same exporter as `GET /export`, so a JSON file written here can
//! be fed back through `lifedash import` or `POST /import`.
//!
//! ```bash
//! lifedash export --user 3f2a... --format md --modules health,trading
//! lifedash export --user 3f2a... --start-date 2026-01-01 --end-date 2026-03-31 -o q1.json
//! ```

use crate::{
    db::{db::Db, records::RecordStore, users::Users},
    libs::{
        bundle::{DateRange, DateRangeError},
        export::{ExportFormat, ExportOptions, Exporter},
        messages::Message,
        module::Module,
    },
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Id of the user whose data is exported
    #[arg(short, long)]
    user: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ExportFormat,

    /// Comma-separated modules to include; all when omitted
    #[arg(short, long)]
    modules: Option<String>,

    /// Inclusive lower bound, `YYYY-MM-DD` or RFC 3339
    #[arg(long)]
    start_date: Option<String>,

    /// Inclusive upper bound, `YYYY-MM-DD` or RFC 3339
    #[arg(long)]
    end_date: Option<String>,

    /// Output path; defaults to the generated file name in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    fn options(&self) -> Result<ExportOptions> {
        let modules = match self.modules.as_deref() {
            Some(raw) => Module::parse_list(raw).map_err(|e| msg_error_anyhow!(Message::UnknownModule(e.0)))?,
            None => Vec::new(),
        };
        let date_range = DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
            .map_err(|e| match e {
                DateRangeError::InvalidDate(value) => msg_error_anyhow!(Message::InvalidDate(value)),
                DateRangeError::StartAfterEnd { start, end } => msg_error_anyhow!(Message::InvalidDateRange(start, end)),
            })?;

        Ok(ExportOptions {
            format: self.format,
            modules,
            date_range,
        })
    }
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let exporter = Exporter::new(args.options()?);
    let db = Db::new()?;

    if Users::new(&db.conn).get(&args.user)?.is_none() {
        msg_bail_anyhow!(Message::UserNotFound(args.user));
    }

    msg_info!(Message::ExportStarted(args.user.clone()));
    let output = exporter
        .export(&RecordStore::new(&db.conn), &args.user)
        .map_err(|e| msg_error_anyhow!(Message::ExportFailed(e.to_string())))?;

    let path = args.output.unwrap_or_else(|| PathBuf::from(&output.file_name));
    fs::write(&path, output.body)?;

    msg_success!(Message::ExportCompleted(path.display().to_string()));
    Ok(())
}
