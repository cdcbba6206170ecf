// SPDX-License-Identifier: Apache-2.0

//! Error types for yogit.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Transport-level classification of a failure.
///
/// Every [`YogitError`] maps onto exactly one of these kinds, which is what
/// the command line reports to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote API answered 400.
    BadRequest,
    /// The remote API answered 401.
    Unauthorized,
    /// Anything else: other statuses, network errors, undecodable bodies,
    /// unexpected response shapes.
    Failure,
}

/// Errors that can occur during yogit operations.
#[derive(Error, Debug)]
pub enum YogitError {
    /// The remote API rejected the request (HTTP 400).
    #[error("Bad request")]
    BadRequest,

    /// The token was refused (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Generic failure: unexpected status, transport error or undecodable body.
    #[error("{message}")]
    Failure {
        /// Error message, usually the raw response body.
        message: String,
    },

    /// A response did not have the expected JSON shape.
    #[error("Unexpected response: {message}")]
    ResponseShape {
        /// Description of the missing or mistyped field.
        message: String,
    },

    /// A paginated fetch did not terminate within the configured page cap.
    #[error("Pagination did not terminate after {pages} pages")]
    PaginationLimit {
        /// Number of pages fetched before giving up.
        pages: u32,
    },

    /// No account has been configured yet.
    #[error("Account required, please `yogit account setup` first.")]
    AccountRequired,

    /// User supplied input that cannot be used (dates, organization...).
    #[error("{message}")]
    InvalidInput {
        /// User-facing explanation.
        message: String,
    },

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Local settings could not be read or written.
    #[error("Settings error: {message}")]
    Settings {
        /// Error message.
        message: String,
    },
}

impl YogitError {
    /// Shorthand for a [`YogitError::ResponseShape`].
    pub fn shape(message: impl Into<String>) -> Self {
        YogitError::ResponseShape {
            message: message.into(),
        }
    }

    /// Shorthand for a [`YogitError::InvalidInput`].
    pub fn invalid(message: impl Into<String>) -> Self {
        YogitError::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns the transport classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            YogitError::BadRequest => ErrorKind::BadRequest,
            YogitError::Unauthorized => ErrorKind::Unauthorized,
            _ => ErrorKind::Failure,
        }
    }
}

impl From<config::ConfigError> for YogitError {
    fn from(err: config::ConfigError) -> Self {
        YogitError::Config {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for YogitError {
    fn from(err: std::io::Error) -> Self {
        YogitError::Settings {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for YogitError {
    fn from(err: toml::de::Error) -> Self {
        YogitError::Settings {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for YogitError {
    fn from(err: toml::ser::Error) -> Self {
        YogitError::Settings {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for YogitError {
    fn from(err: reqwest::Error) -> Self {
        YogitError::Failure {
            message: err.to_string(),
        }
    }
}
