//! Unified error types for the RSVP service.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation,
//! not-found, and invariant rejections are user-correctable per-request
//! failures; the remaining variants cover startup and storage problems.

use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// A submitted field was malformed, missing, or would break a uniqueness rule
    #[error("{message}")]
    Validation {
        /// User-correctable description of what was wrong
        message: String,
    },

    /// A lookup value or referenced record matched nothing
    #[error("{what} not found")]
    NotFound {
        /// What was being looked up
        what: String,
    },

    /// The requested state change would break a roster or party-size invariant
    #[error("{message}")]
    Invariant {
        /// Informational description; the operation was rejected as a no-op
        message: String,
    },

    /// Caller is not an authenticated administrator
    #[error("administrator authentication required")]
    Unauthorized,

    /// Configuration file or value problem
    #[error("Configuration error: {message}")]
    Config {
        /// What failed to load or parse
        message: String,
    },

    /// Storage layer failure; the enclosing transaction rolled back
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Underlying I/O failure (config file reads, socket bind)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Shorthand for an [`Error::Invariant`] rejection.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
