//! The export bundle: every selected module's records plus metadata.
//!
//! Serialized shape:
//!
//! ```json
//! {
//!   "metadata": {
//!     "exportedAt": "2026-10-19T14:30:22.000Z",
//!     "userId": "…",
//!     "version": 1,
//!     "filters": { "modules": ["health"], "dateRange": null }
//!   },
//!   "health": [ { "id": 1, "date": "2026-10-18", … } ]
//! }
//! ```

use crate::libs::module::{FieldKind, FieldSpec, Module};
use crate::libs::record::{format_date, format_timestamp, parse_date, parse_datetime, Record};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const BUNDLE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub metadata: ExportMetadata,
    /// Records per selected module, keyed by wire name, in canonical order.
    #[serde(flatten)]
    pub modules: BTreeMap<Module, Vec<Record>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: DateTime<Utc>,
    pub user_id: String,
    pub version: u32,
    pub filters: ExportFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilters {
    pub modules: Vec<Module>,
    pub date_range: Option<DateRange>,
}

impl ExportBundle {
    pub fn record_count(&self, module: Module) -> usize {
        self.modules.get(&module).map_or(0, Vec::len)
    }

    pub fn total_records(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDate(String),

    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: String, end: String },
}

/// Inclusive date filter; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Builds a range from raw query values.
    ///
    /// A date-only `start` begins at 00:00:00.000 and a date-only `end` stops
    /// at 23:59:59.999 of that day, so whole days are included. Returns
    /// `Ok(None)` when neither bound is given.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<DateRange>, DateRangeError> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());
        if start.is_none() && end.is_none() {
            return Ok(None);
        }

        let start = start.map(|s| parse_bound(s, false)).transpose()?;
        let end = end.map(|s| parse_bound(s, true)).transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(DateRangeError::StartAfterEnd {
                    start: format_timestamp(&start),
                    end: format_timestamp(&end),
                });
            }
        }
        Ok(Some(DateRange { start, end }))
    }

    /// Lower and upper bound formatted for comparison with `field`'s stored text.
    pub fn bounds_for(&self, field: &FieldSpec) -> (Option<String>, Option<String>) {
        let format = |ts: &DateTime<Utc>| match field.kind {
            FieldKind::Date => format_date(&ts.date_naive()),
            _ => format_timestamp(ts),
        };
        (self.start.as_ref().map(format), self.end.as_ref().map(format))
    }
}

fn parse_bound(input: &str, end_of_day: bool) -> Result<DateTime<Utc>, DateRangeError> {
    // `2026-1-31` is as date-only as `2026-01-31`.
    let has_time = input.contains(|c: char| c == 'T' || c == 't' || c == ' ');
    if !has_time {
        if let Some(date) = parse_date(input) {
            let start_of_day = date.and_time(NaiveTime::MIN).and_utc();
            return Ok(if end_of_day {
                start_of_day + Duration::days(1) - Duration::milliseconds(1)
            } else {
                start_of_day
            });
        }
    }
    parse_datetime(input).ok_or_else(|| DateRangeError::InvalidDate(input.to_string()))
}
