// src/error.rs

//! Unified error handling for the job scanner.

use std::fmt;

use thiserror::Error;

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A credential needed for an outbound call is not set
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The search provider answered with a failure
    #[error("Search error for {context}: {message}")]
    Search { context: String, message: String },

    /// Template rendering failed
    #[error("Template error in {template}: {message}")]
    Template { template: String, message: String },

    /// Email could not be built or delivered
    #[error("Email error: {0}")]
    Email(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a missing credential error.
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential(name.into())
    }

    /// Create a search error with context.
    pub fn search(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Search {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a template error.
    pub fn template(template: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Template {
            template: template.into(),
            message: message.to_string(),
        }
    }

    /// Create an email error.
    pub fn email(message: impl fmt::Display) -> Self {
        Self::Email(message.to_string())
    }

    /// Whether this error is a skipped call rather than a failed one.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential(_))
    }
}
