//! Custom error types for tasksync.
//!
//! The scanning core is almost total: the only failure it can produce is a
//! bad ignore pattern. Everything else here belongs to the shell around it
//! (repository access, the snapshot store, configuration files).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tasksync operations
#[derive(Error, Debug)]
pub enum TaskSyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// An ignore pattern is not a valid regular expression
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // =========================================================================
    // Scan Errors
    // =========================================================================
    /// Listing or reading the repository failed
    #[error("Repository error at {path}: {message}")]
    Repository { path: String, message: String },

    /// The scan did not finish within its time budget
    #[error("Scan timed out after {elapsed_ms}ms")]
    ScanTimeout { elapsed_ms: u64 },

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Snapshot store failure
    #[error("Task store error: {message}")]
    Store { message: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskSyncError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a repository error
    pub fn repository(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Repository {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error comes from bad configuration rather than the repository
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidIgnorePattern { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScanTimeout { .. } => 3,
            Self::Config { .. } | Self::InvalidIgnorePattern { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for tasksync results
pub type Result<T> = std::result::Result<T, TaskSyncError>;
