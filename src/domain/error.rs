use std::io;

use thiserror::Error;

/// Library-wide error type for fieldmap operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Required environment variable is not set.
    #[error("Environment variable '{0}' is not set")]
    EnvironmentVariableMissing(String),

    /// A commit was attempted with no provider object selected.
    #[error("No provider object selected")]
    MissingSelection,

    /// Two or more rows bind the same provider field.
    #[error("Provider field '{field}' is bound by more than one row ({})", .rows.join(", "))]
    DuplicateBinding { field: String, rows: Vec<String> },

    /// Create, update or delete against the installation API failed.
    #[error("Installation request failed: {message}")]
    ExternalMutation { message: String, status: Option<u16> },

    /// A mutation is already pending for this installation.
    #[error("Another installation change is still in flight")]
    MutationInFlight,

    /// A submit was resolved without one having been started.
    #[error("No installation change is pending")]
    NoPendingSubmit,

    /// Operation requires an existing installation.
    #[error("No installation exists for this integration")]
    NoInstallation,

    /// Mapping row identifier does not exist.
    #[error("Mapping row '{0}' not found")]
    RowNotFound(String),

    /// Provider object is not part of the manifest.
    #[error("Object '{0}' not found in manifest")]
    ObjectNotFound(String),

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Whether the error came back from the installation API.
    pub fn is_external(&self) -> bool {
        matches!(self, AppError::ExternalMutation { .. })
    }
}
