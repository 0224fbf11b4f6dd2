//! Exhibit error types

use crate::engine::EngineError;
use crate::types::CapabilityKind;

/// Exhibit error types
#[derive(Debug, thiserror::Error)]
pub enum ExhibitError {
    // Request validation errors
    #[error("{0}")]
    InvalidInput(String),

    #[error("Max request length exceeded for model {model}! Max: {max} Actual: {actual}")]
    RequestTooLarge {
        model: String,
        max: usize,
        actual: usize,
    },

    /// Id is not part of the global enumeration for its kind.
    #[error("No {kind} with id '{id}'")]
    UnknownCapability { kind: CapabilityKind, id: String },

    /// Id is globally known but not enabled for this model.
    #[error("{} with id '{id}' is not supported for this model", kind.title())]
    UnsupportedCapability { kind: CapabilityKind, id: String },

    // Engine errors are never handled by the endpoint layer
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    // Permalink errors
    #[error("Permalinks are not enabled")]
    PermalinksDisabled,

    #[error("Unrecognized permalink: {0}")]
    UnrecognizedPermalink(String),

    #[error("Permalink not found: {0}")]
    PermalinkNotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ExhibitError {
    /// HTTP status code this error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_)
            | Self::RequestTooLarge { .. }
            | Self::PermalinksDisabled
            | Self::UnrecognizedPermalink(_) => 400,
            Self::UnknownCapability { .. }
            | Self::UnsupportedCapability { .. }
            | Self::PermalinkNotFound(_) => 404,
            Self::Engine(_) | Self::Storage(_) | Self::Configuration(_) => 500,
        }
    }

    /// Whether the message is safe to show to clients outside development mode.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<serde_json::Error> for ExhibitError {
    fn from(err: serde_json::Error) -> Self {
        ExhibitError::InvalidInput(err.to_string())
    }
}

/// Result type alias for Exhibit operations
pub type Result<T> = std::result::Result<T, ExhibitError>;
