//! Display implementation for lifedash messages.
//!
//! All user-facing wording is defined here; call sites only pick a
//! [`Message`] variant and its parameters.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === EXPORT MESSAGES ===
            Message::ExportStarted(user) => format!("Exporting data for user {}", user),
            Message::ExportCompleted(path) => format!("Export completed: {}", path),
            Message::ExportFailed(error) => format!("Export failed: {}", error),

            // === IMPORT MESSAGES ===
            Message::ImportStarted(user) => format!("Importing data for user {}", user),
            Message::ImportCompleted(created, failed) => format!("Import finished: {} created, {} failed", created, failed),
            Message::ImportFileReadFailed(path) => format!("Failed to read import file {}", path),
            Message::ImportResultsHeader => "Import results:".to_string(),

            // === USER MESSAGES ===
            Message::UserCreated(name, id) => format!("User '{}' created with id {}", name, id),
            Message::TokenIssued(token) => format!("API token: {}", token),
            Message::UserNotFound(id) => format!("User {} not found", id),
            Message::NoUsersFound => "No users found".to_string(),

            // === SERVER MESSAGES ===
            Message::ServerStarting(addr) => format!("Starting lifedash server on {}", addr),
            Message::ServerListening(addr) => format!("Listening on http://{}", addr),
            Message::ServerStopped => "Server stopped".to_string(),
            Message::InvalidServerAddress(addr) => format!("Invalid server address: {}", addr),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::ConfigModuleServer => "Server settings".to_string(),

            // === DATABASE MESSAGES ===
            Message::DbConnectionFailed => "Failed to connect to database".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),

            // === VALIDATION MESSAGES ===
            Message::UnknownModule(name) => format!("Unknown module '{}'", name),
            Message::InvalidDate(value) => format!("Invalid date '{}' (expected YYYY-MM-DD or RFC 3339)", value),
            Message::InvalidDateRange(start, end) => format!("Start date {} is after end date {}", start, end),

            // === PROMPTS ===
            Message::PromptServerHost => "Server host".to_string(),
            Message::PromptServerPort => "Server port".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
        };
        write!(f, "{}", text)
    }
}
