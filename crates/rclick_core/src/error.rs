//! Error types for rclick.
//!
//! Interaction itself never fails; errors only arise at the edges where menus
//! and configuration are loaded from external data.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rclick.
#[derive(Debug, Error)]
pub enum RclickError {
    /// A menu entry could not be turned into a `MenuItem`.
    #[error("Invalid menu item at index {index}: {message}")]
    InvalidItem {
        /// Position of the offending entry in the source list.
        index: usize,
        /// Human-readable error message.
        message: String,
    },

    /// JSON could not be parsed.
    #[error("JSON error: {message}")]
    Json {
        /// Human-readable error message.
        message: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration was parsed but is not usable.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// Reading a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RclickError {
    // ========== Constructors ==========

    /// Create a new invalid item error.
    pub fn invalid_item(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidItem { index, message: message.into() }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a new I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    // ========== Methods ==========

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidItem { .. } => "Menu",
            Self::Json { .. } => "JSON",
            Self::Config { .. } => "Config",
            Self::Io { .. } => "I/O",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::InvalidItem { .. } => {
                Some("Each entry needs a string \"label\" or \"type\": \"divider\"")
            }
            Self::Json { .. } => Some("Check the file for syntax errors"),
            Self::Config { .. } => None,
            Self::Io { .. } => Some("Check that the file exists and is readable"),
        }
    }
}

/// Convert from serde_json::Error to RclickError.
impl From<serde_json::Error> for RclickError {
    fn from(err: serde_json::Error) -> Self {
        RclickError::Json { message: err.to_string(), source: err }
    }
}
