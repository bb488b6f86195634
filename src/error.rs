use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsdeckError {
    #[error("Not in an opsdeck workspace. Run 'opsdeck init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .opsdeck/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Data service error: {0}")]
    Service(String),

    #[error("Another write is still in flight for this view")]
    WriteInFlight,

    #[error("Object storage error: {0}")]
    ObjectStorage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, OpsdeckError>;
