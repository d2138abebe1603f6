//! CSV and Markdown renderings of an [`ExportBundle`].
//!
//! Both renderers are pure: same bundle in, same text out, no I/O. Columns
//! come from the module schema, not from the records, so a module with no
//! records still renders its heading and header row.
//!
//! ## CSV layout
//!
//! ```text
//! # bookmarks
//! id,url,title,description,category,tags,isFavorite,createdAt
//! 1,https://example.com,Example,,,,false,2026-10-19T08:00:00.000Z
//!
//! # health
//! id,date,weight,sleepHours,steps,mood,notes,createdAt
//! ```
//!
//! ## Markdown layout
//!
//! A title, metadata bullets, then one `## Title (count)` section per module
//! with a pipe table or `_No records._`.

use crate::libs::bundle::{DateRange, ExportBundle};
use crate::libs::module::Module;
use crate::libs::record::{format_timestamp, Record};
use serde_json::Value;

/// Text of a single cell. Nulls are empty, booleans `true`/`false`.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

fn record_cells(module: Module, record: &Record) -> Vec<String> {
    module
        .schema()
        .headers()
        .into_iter()
        .map(|header| format_cell(record.get(header)))
        .collect()
}

/// Renders every module as a CSV section separated by blank lines.
///
/// An empty bundle renders as an empty document.
pub fn render_csv(bundle: &ExportBundle) -> Result<String, csv::Error> {
    let mut sections = Vec::with_capacity(bundle.modules.len());

    for (module, records) in &bundle.modules {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
        wtr.write_record([format!("# {}", module.name())])?;
        wtr.write_record(module.schema().headers())?;
        for record in records {
            wtr.write_record(record_cells(*module, record))?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        sections.push(String::from_utf8_lossy(&bytes).into_owned());
    }

    Ok(sections.join("\n"))
}

fn escape_markdown(cell: &str) -> String {
    cell.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

fn describe_range(range: Option<&DateRange>) -> String {
    match range {
        None => "all time".to_string(),
        Some(range) => {
            let bound = |b: Option<chrono::DateTime<chrono::Utc>>| b.map(|ts| format_timestamp(&ts)).unwrap_or_else(|| "…".to_string());
            format!("{} to {}", bound(range.start), bound(range.end))
        }
    }
}

/// Renders the bundle as a Markdown document.
pub fn render_markdown(bundle: &ExportBundle) -> String {
    let meta = &bundle.metadata;
    let mut out = String::from("# Life Dashboard Export\n\n");

    let modules: Vec<&str> = bundle.modules.keys().map(|m| m.name()).collect();
    out.push_str(&format!("- **Exported at:** {}\n", format_timestamp(&meta.exported_at)));
    out.push_str(&format!("- **User:** {}\n", meta.user_id));
    out.push_str(&format!(
        "- **Modules:** {}\n",
        if modules.is_empty() { "none".to_string() } else { modules.join(", ") }
    ));
    out.push_str(&format!("- **Date range:** {}\n", describe_range(meta.filters.date_range.as_ref())));

    for (module, records) in &bundle.modules {
        out.push_str(&format!("\n## {} ({})\n\n", module.title(), records.len()));

        if records.is_empty() {
            out.push_str("_No records._\n");
            continue;
        }

        let headers = module.schema().headers();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));
        out.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
        for record in records {
            let cells: Vec<String> = record_cells(*module, record).iter().map(|c| escape_markdown(c)).collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }

    out
}
