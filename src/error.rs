//! Error types for stc
//!
//! All modules use `StcResult<T>` as their return type. Errors raised while
//! processing a single artifact are classified into a [`FailureReason`]
//! for the install report.
//!
//! [`FailureReason`]: crate::install::FailureReason

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stc operations
pub type StcResult<T> = Result<T, StcError>;

/// All errors that can occur in stc
#[derive(Error, Debug)]
pub enum StcError {
    // Platform errors
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Unknown architecture: {0}")]
    UnknownArch(String),

    // Fetch errors
    #[error("HTTP 404: {url}")]
    NotFound { url: String },

    #[error("Download timed out: {url}")]
    Timeout { url: String },

    #[error("Download tool not found: {tool}")]
    ToolMissing { tool: String },

    #[error("{tool} failed with exit code {}", display_code(.code))]
    ToolExit { tool: String, code: Option<i32> },

    // Extract errors
    #[error("Failed to extract {}{}{}", .archive.display(), display_exit(.code), display_stderr(.stderr))]
    Extract {
        archive: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine home directory; set STC_HOME")]
    HomeDirMissing,

    // Lookup errors
    #[error("No ABI known for runtime version {0}")]
    AbiUnknown(String),

    #[error("Binding not installed: {}", .0.display())]
    BindingMissing(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

fn display_exit(code: &Option<i32>) -> String {
    code.map(|code| format!(": exit code {}", code))
        .unwrap_or_default()
}

fn display_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" ({})", trimmed)
    }
}

impl StcError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the remote artifact simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolMissing { .. } => Some("Install curl or make sure it is on PATH"),
            Self::Timeout { .. } => Some("Check network connectivity and retry: stc install"),
            Self::HomeDirMissing => Some("Set STC_HOME to a writable directory"),
            Self::BindingMissing(_) => Some("Run: stc install"),
            Self::ConfigInvalid { .. } => Some("Run: stc config init --force"),
            _ => None,
        }
    }
}
