//! Error types for smartnotes-core

use thiserror::Error;

/// Result type alias using smartnotes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in smartnotes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Bad credentials, or an expired/invalid bearer token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Missing or malformed fields, rejected before submission
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The referenced note is not owned by the current user
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Non-2xx response with no clearer classification
    #[error("Remote error: {0}")]
    Remote(String),

    /// Transport failure talking to the remote
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Durable token storage failure
    #[error("Token storage error: {0}")]
    TokenStorage(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Human-readable message without the category prefix.
    ///
    /// For remote failures this is the server's `detail`/`message` text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Authentication(message)
            | Self::Validation(message)
            | Self::NotFound(message)
            | Self::Remote(message)
            | Self::TokenStorage(message)
            | Self::Config(message) => message.clone(),
            Self::Http(error) => error.to_string(),
            Self::Serialization(error) => error.to_string(),
        }
    }

    /// Whether the failure means the current bearer token is no longer usable.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Whether the failure belongs to the remote category (network or non-2xx).
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::Http(_))
    }
}
