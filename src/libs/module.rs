//! Dashboard modules and their record schemas.
//!
//! Every functional area of the dashboard (blog, bookmarks, health, ...) is a
//! [`Module`] variant. Each variant maps to a static [`ModuleSchema`] that
//! describes its table, its fields and the field used for date filtering.
//! Storage, rendering and import are driven by the schema, so adding a module
//! means adding a variant and a schema, nothing else.
//!
//! ## Usage
//!
//! ```rust
//! use lifedash::libs::module::Module;
//!
//! let module: Module = "quickNotes".parse().unwrap();
//! assert_eq!(module.schema().table, "quick_notes");
//! assert_eq!(module.schema().date_field, "createdAt");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A functional area of the dashboard.
///
/// Variant order is the canonical module order: bundles, renderers and
/// import results all list modules in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Module {
    Blog,
    Bookmarks,
    Health,
    Projects,
    Trading,
    Social,
    QuickNotes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown module '{0}'")]
pub struct UnknownModule(pub String);

impl Module {
    pub const ALL: [Module; 7] = [
        Module::Blog,
        Module::Bookmarks,
        Module::Health,
        Module::Projects,
        Module::Trading,
        Module::Social,
        Module::QuickNotes,
    ];

    /// Wire name used as bundle key and in query strings.
    pub fn name(self) -> &'static str {
        match self {
            Module::Blog => "blog",
            Module::Bookmarks => "bookmarks",
            Module::Health => "health",
            Module::Projects => "projects",
            Module::Trading => "trading",
            Module::Social => "social",
            Module::QuickNotes => "quickNotes",
        }
    }

    /// Human-readable heading used by the Markdown renderer.
    pub fn title(self) -> &'static str {
        match self {
            Module::Blog => "Blog",
            Module::Bookmarks => "Bookmarks",
            Module::Health => "Health",
            Module::Projects => "Projects",
            Module::Trading => "Trading",
            Module::Social => "Social",
            Module::QuickNotes => "Quick Notes",
        }
    }

    pub fn schema(self) -> &'static ModuleSchema {
        match self {
            Module::Blog => &BLOG,
            Module::Bookmarks => &BOOKMARKS,
            Module::Health => &HEALTH,
            Module::Projects => &PROJECTS,
            Module::Trading => &TRADING,
            Module::Social => &SOCIAL,
            Module::QuickNotes => &QUICK_NOTES,
        }
    }

    /// Parses a comma-separated module list (`"blog,health"`).
    ///
    /// Blank entries are skipped and duplicates collapsed; the result is in
    /// canonical module order. An empty input yields an empty list, which
    /// callers treat as "all modules".
    pub fn parse_list(input: &str) -> Result<Vec<Module>, UnknownModule> {
        let mut modules = Vec::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            modules.push(part.parse::<Module>()?);
        }
        modules.sort();
        modules.dedup();
        Ok(modules)
    }
}

impl Module {
    /// Exact wire-name lookup, used for bundle keys.
    pub fn from_wire_name(name: &str) -> Option<Module> {
        Module::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl FromStr for Module {
    type Err = UnknownModule;

    /// Accepts the wire name case-insensitively, plus `quick_notes` / `quick-notes`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| *c != '_' && *c != '-').collect::<String>().to_lowercase();
        Module::ALL
            .into_iter()
            .find(|m| m.name().to_lowercase() == normalized)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage and wire type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    Bool,
    /// Calendar date stored as `YYYY-MM-DD`.
    Date,
    /// UTC timestamp stored as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    DateTime,
}

impl FieldKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Date | FieldKind::DateTime => "TEXT",
            FieldKind::Integer | FieldKind::Bool => "INTEGER",
            FieldKind::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// camelCase name used in bundles.
    pub name: &'static str,
    /// snake_case column name.
    pub column: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind, required: true }
    }

    const fn optional(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind, required: false }
    }
}

/// Column every module table carries; filled with the import time when absent.
pub const CREATED_AT: FieldSpec = FieldSpec::optional("createdAt", "created_at", FieldKind::DateTime);

#[derive(Debug)]
pub struct ModuleSchema {
    pub module: Module,
    pub table: &'static str,
    /// Name of the field the date-range filter applies to.
    pub date_field: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ModuleSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn date_spec(&self) -> &'static FieldSpec {
        // Every schema below names one of its own fields; checked by tests.
        self.field(self.date_field).unwrap_or(&CREATED_AT)
    }

    /// Column headers in export order: `id` followed by every field name.
    pub fn headers(&self) -> Vec<&'static str> {
        std::iter::once("id").chain(self.fields.iter().map(|f| f.name)).collect()
    }

    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let null = if f.required { " NOT NULL" } else { "" };
                format!("    {} {}{}", f.column, f.kind.sql_type(), null)
            })
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    id INTEGER PRIMARY KEY AUTOINCREMENT,\n    user_id TEXT NOT NULL,\n{}\n)",
            self.table,
            columns.join(",\n")
        )
    }
}

use FieldKind::*;

static BLOG: ModuleSchema = ModuleSchema {
    module: Module::Blog,
    table: "blog_posts",
    date_field: "createdAt",
    fields: &[
        FieldSpec::required("title", "title", Text),
        FieldSpec::optional("slug", "slug", Text),
        FieldSpec::optional("content", "content", Text),
        FieldSpec::optional("excerpt", "excerpt", Text),
        FieldSpec::required("status", "status", Text),
        FieldSpec::optional("tags", "tags", Text),
        FieldSpec::optional("publishedAt", "published_at", DateTime),
        CREATED_AT,
    ],
};

static BOOKMARKS: ModuleSchema = ModuleSchema {
    module: Module::Bookmarks,
    table: "bookmarks",
    date_field: "createdAt",
    fields: &[
        FieldSpec::required("url", "url", Text),
        FieldSpec::required("title", "title", Text),
        FieldSpec::optional("description", "description", Text),
        FieldSpec::optional("category", "category", Text),
        FieldSpec::optional("tags", "tags", Text),
        FieldSpec::optional("isFavorite", "is_favorite", Bool),
        CREATED_AT,
    ],
};

static HEALTH: ModuleSchema = ModuleSchema {
    module: Module::Health,
    table: "health_entries",
    date_field: "date",
    fields: &[
        FieldSpec::required("date", "date", Date),
        FieldSpec::optional("weight", "weight", Real),
        FieldSpec::optional("sleepHours", "sleep_hours", Real),
        FieldSpec::optional("steps", "steps", Integer),
        FieldSpec::optional("mood", "mood", Integer),
        FieldSpec::optional("notes", "notes", Text),
        CREATED_AT,
    ],
};

static PROJECTS: ModuleSchema = ModuleSchema {
    module: Module::Projects,
    table: "projects",
    date_field: "createdAt",
    fields: &[
        FieldSpec::required("name", "name", Text),
        FieldSpec::optional("description", "description", Text),
        FieldSpec::required("status", "status", Text),
        FieldSpec::optional("priority", "priority", Text),
        FieldSpec::optional("startDate", "start_date", Date),
        FieldSpec::optional("dueDate", "due_date", Date),
        FieldSpec::optional("progress", "progress", Integer),
        CREATED_AT,
    ],
};

static TRADING: ModuleSchema = ModuleSchema {
    module: Module::Trading,
    table: "trades",
    date_field: "entryDate",
    fields: &[
        FieldSpec::required("symbol", "symbol", Text),
        FieldSpec::required("direction", "direction", Text),
        FieldSpec::required("entryPrice", "entry_price", Real),
        FieldSpec::optional("exitPrice", "exit_price", Real),
        FieldSpec::required("quantity", "quantity", Real),
        FieldSpec::required("entryDate", "entry_date", DateTime),
        FieldSpec::optional("exitDate", "exit_date", DateTime),
        FieldSpec::optional("pnl", "pnl", Real),
        FieldSpec::optional("strategy", "strategy", Text),
        FieldSpec::optional("notes", "notes", Text),
        CREATED_AT,
    ],
};

static SOCIAL: ModuleSchema = ModuleSchema {
    module: Module::Social,
    table: "social_posts",
    date_field: "createdAt",
    fields: &[
        FieldSpec::required("platform", "platform", Text),
        FieldSpec::required("content", "content", Text),
        FieldSpec::required("status", "status", Text),
        FieldSpec::optional("scheduledFor", "scheduled_for", DateTime),
        FieldSpec::optional("publishedAt", "published_at", DateTime),
        CREATED_AT,
    ],
};

static QUICK_NOTES: ModuleSchema = ModuleSchema {
    module: Module::QuickNotes,
    table: "quick_notes",
    date_field: "createdAt",
    fields: &[
        FieldSpec::required("content", "content", Text),
        FieldSpec::optional("color", "color", Text),
        FieldSpec::optional("isPinned", "is_pinned", Bool),
        CREATED_AT,
    ],
};
