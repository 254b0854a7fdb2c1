//! Error types for rq-db

use thiserror::Error;

/// Query executor errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (Q001)
    #[error("[Q001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (Q002)
    #[error("[Q002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction begin/commit/rollback error (Q003)
    #[error("[Q003] Transaction operation failed: {0}")]
    TransactionError(String),

    /// Statement issued against a transaction that was already rolled back (Q004)
    #[error("[Q004] Transaction was rolled back after an earlier failure and is no longer usable")]
    TransactionAborted,

    /// Script file could not be read (Q005)
    #[error("[Q005] Failed to read SQL script {path}: {source}")]
    ScriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Last failure after the retry loop gave up, original error preserved (Q006)
    #[error("[Q006] Escalated exception after {attempts} attempt(s): {source}")]
    Escalated {
        attempts: u32,
        #[source]
        source: Box<DbError>,
    },

    /// Configuration file missing, unreadable or invalid (Q007)
    #[error("[Q007] Invalid executor config: {0}")]
    ConfigError(String),

    /// Value conversion between table rows and records failed (Q008)
    #[error("[Q008] Value conversion failed: {0}")]
    ConversionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Innermost error, looking through any `Escalated` wrappers.
    pub fn root(&self) -> &DbError {
        match self {
            DbError::Escalated { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether another attempt of the same statement could possibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.root(),
            DbError::TransactionAborted | DbError::ConfigError(_) | DbError::ScriptRead { .. }
        )
    }
}

impl From<serde_yaml::Error> for DbError {
    fn from(err: serde_yaml::Error) -> Self {
        DbError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::ConversionError(err.to_string())
    }
}
