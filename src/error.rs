//! Error types for TinyTable
//!
//! Provides a unified error type for all operations.
//!
//! Errors fall into two classes. Storage-side failures (I/O, corruption,
//! serialization, configuration) are fatal for the session. Table-side
//! failures are operator mistakes: they are reported and the session
//! continues with nothing mutated.

use thiserror::Error;

/// Result type alias using TinyTableError
pub type Result<T> = std::result::Result<T, TinyTableError>;

/// Unified error type for TinyTable operations
#[derive(Debug, Error)]
pub enum TinyTableError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Key not found")]
    KeyNotFound,

    #[error("Corrupt schema record: {0}")]
    SchemaCorrupt(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Table Errors (reported to the operator, never fatal)
    // -------------------------------------------------------------------------
    #[error("[{op}] table not defined.")]
    TableNotDefined { op: &'static str },

    #[error("[{op}] {expected}")]
    Arity { op: &'static str, expected: String },

    #[error("[{op}] invalid name {name:?}: names must be non-empty and free of control characters")]
    InvalidName { op: &'static str, name: String },

    #[error("[table] duplicate column name \"{0}\"")]
    DuplicateColumn(String),

    #[error("[{op}] unknown column \"{column}\"")]
    UnknownColumn { op: &'static str, column: String },

    #[error("Unknown command \"{0}\", ignored.")]
    UnknownCommand(String),

    #[error("Input line {line} is not valid UTF-8, ignored.")]
    InvalidInput { line: usize },
}

impl TinyTableError {
    /// Whether this error must end the session.
    ///
    /// Operator errors leave schema and data untouched; everything else
    /// comes from the storage stack, which has no recovery path.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            TinyTableError::TableNotDefined { .. }
                | TinyTableError::Arity { .. }
                | TinyTableError::InvalidName { .. }
                | TinyTableError::DuplicateColumn(_)
                | TinyTableError::UnknownColumn { .. }
                | TinyTableError::UnknownCommand(_)
                | TinyTableError::InvalidInput { .. }
        )
    }

    /// Attach the operation name to an `InvalidName` raised below the table layer.
    pub(crate) fn in_op(self, op: &'static str) -> Self {
        match self {
            TinyTableError::InvalidName { name, .. } => TinyTableError::InvalidName { op, name },
            other => other,
        }
    }
}

impl From<bincode::Error> for TinyTableError {
    fn from(e: bincode::Error) -> Self {
        TinyTableError::Serialization(e.to_string())
    }
}
