//! Imports an export bundle file into a user's account.

use crate::{
    db::{db::Db, records::RecordStore, users::Users},
    libs::{import::Importer, messages::Message, view::View},
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Id of the user receiving the records
    #[arg(short, long)]
    user: String,

    /// Bundle file produced by `lifedash export --format json`
    file: PathBuf,
}

pub fn cmd(args: ImportArgs) -> Result<()> {
    let content =
        fs::read_to_string(&args.file).map_err(|_| msg_error_anyhow!(Message::ImportFileReadFailed(args.file.display().to_string())))?;
    let payload: Value = serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let db = Db::new()?;
    if Users::new(&db.conn).get(&args.user)?.is_none() {
        msg_bail_anyhow!(Message::UserNotFound(args.user));
    }

    msg_info!(Message::ImportStarted(args.user.clone()));
    let store = RecordStore::new(&db.conn);
    let report = Importer::new(&store).import(&args.user, &payload)?;

    msg_print!(Message::ImportResultsHeader, true);
    View::import_report(&report)?;

    if report.total_failed > 0 {
        msg_warning!(Message::ImportCompleted(report.total_created, report.total_failed));
    } else {
        msg_success!(Message::ImportCompleted(report.total_created, report.total_failed));
    }
    Ok(())
}
