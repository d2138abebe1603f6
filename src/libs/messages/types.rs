#[derive(Debug, Clone)]
pub enum Message {
    // === EXPORT MESSAGES ===
    ExportStarted(String),            // user id
    ExportCompleted(String),          // output path
    ExportFailed(String),             // error

    // === IMPORT MESSAGES ===
    ImportStarted(String),               // user id
    ImportCompleted(usize, usize),       // created, failed
    ImportFileReadFailed(String),        // path
    ImportResultsHeader,

    // === USER MESSAGES ===
    UserCreated(String, String), // name, id
    TokenIssued(String),         // token
    UserNotFound(String),        // id
    NoUsersFound,

    // === SERVER MESSAGES ===
    ServerStarting(String),  // address
    ServerListening(String), // address
    ServerStopped,
    InvalidServerAddress(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    ConfigModuleServer,

    // === DATABASE MESSAGES ===
    DbConnectionFailed,
    DatabaseUpToDate,

    // === VALIDATION MESSAGES ===
    UnknownModule(String),
    InvalidDate(String),
    InvalidDateRange(String, String), // start, end

    // === PROMPTS ===
    PromptServerHost,
    PromptServerPort,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
}
