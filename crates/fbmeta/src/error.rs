//! Error types for schema build, update, and export operations.

use thiserror::Error;

/// Main error type for fbmeta operations.
#[derive(Error, Debug)]
pub enum MetaError {
    /// Missing or invalid directory or file path
    #[error("Path error: {0}")]
    Path(String),

    /// Database creation refused or failed at the driver level
    #[error("Database creation failed: {0}")]
    Creation(String),

    /// No eligible scripts found for an operation
    #[error("Script discovery failed: {0}")]
    ScriptDiscovery(String),

    /// A single statement failed, with the category it ran under
    #[error("Statement failed while processing {category}: {message}\n  Statement: {statement}")]
    Execution {
        category: String,
        statement: String,
        message: String,
    },

    /// Drop-after-failure itself failed. Always fatal: the database file
    /// must be removed by hand.
    #[error("FATAL: failed to drop database after a build failure: {0}")]
    Cleanup(String),

    /// Connecting to the database failed (bad connection string, no server)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Firebird driver error
    #[error("Driver error: {0}")]
    Driver(#[from] rsfbclient::FbError),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line usage or argument combination
    #[error("Usage error: {0}")]
    Usage(String),
}

impl MetaError {
    /// Create an Execution error with its category and statement context.
    pub fn execution(
        category: impl Into<String>,
        statement: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        MetaError::Execution {
            category: category.into(),
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for this error kind.
    ///
    /// Usage and validation problems exit with 1; everything else is an
    /// unexpected runtime failure and exits with 255 (the wrapped form
    /// of -1).
    pub fn exit_code(&self) -> u8 {
        match self {
            MetaError::Usage(_)
            | MetaError::Path(_)
            | MetaError::ScriptDiscovery(_)
            | MetaError::Connection(_) => 1,
            _ => 255,
        }
    }
}

/// Result type alias for fbmeta operations.
pub type Result<T> = std::result::Result<T, MetaError>;
