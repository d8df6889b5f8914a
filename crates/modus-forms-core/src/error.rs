//! Core error types for modus-forms.
//!
//! Forms fail loudly only for programmer misuse: a form type that declares no
//! fields, or an unknown error format selector. Data-shape problems (missing
//! fields, undeclared fields, queries before validation) never produce an
//! error; they degrade to empty results instead.

use thiserror::Error;

/// The primary error type for modus-forms.
#[derive(Error, Debug)]
pub enum FormsError {
    // ── Programmer misuse ────────────────────────────────────────────

    /// A form or settings source is missing or invalid.
    ///
    /// Raised when a form type declares no fields, and when a settings file
    /// cannot be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A caller passed an argument the API does not recognize.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormsError {
    /// Returns `true` for errors caused by misusing the API rather than by
    /// the environment.
    ///
    /// - `ConfigurationError`, `InvalidArgument` -> `true`
    /// - Everything else -> `false`
    pub const fn is_programmer_error(&self) -> bool {
        matches!(self, Self::ConfigurationError(_) | Self::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for FormsError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormsError>`.
pub type FormsResult<T> = Result<T, FormsError>;
