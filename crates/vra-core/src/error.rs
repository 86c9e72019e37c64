//! Error types for vRA operations.
//!
//! This module provides the error type shared by every vRA client crate, including the
//! mapping from unexpected HTTP statuses to process exit codes.

use thiserror::Error;

/// Main error type for vRA operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The service answered with a status other than 200 or 201
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body text
        body: String,
    },

    /// An expected JSON field or array element is absent
    #[error("Missing field in response: {0}")]
    MissingField(String),

    /// The `Location` header is absent or does not contain an id
    #[error("Invalid Location header: {0}")]
    InvalidLocation(String),

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for service: {0}")]
    Timeout(String),

    /// Service could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for vRA operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code used for failures that did not come from an HTTP status.
pub const GENERIC_EXIT_CODE: i32 = 1;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidLocation(_) => "INVALID_LOCATION",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Process exit code for a command-line caller.
    ///
    /// Unexpected statuses exit with the HTTP status itself; everything else exits with
    /// [`GENERIC_EXIT_CODE`].
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.status()
            .map_or(GENERIC_EXIT_CODE, i32::from)
    }

    /// Human-readable report printed before a command-line caller exits.
    #[must_use]
    pub fn report(&self) -> String {
        match self {
            Self::UnexpectedStatus { status, body } => {
                format!("STATUS: {status} \nERROR: {body}")
            }
            other => format!("ERROR: {other}"),
        }
    }

    /// Print [`Error::report`] to stdout and terminate with [`Error::exit_code`].
    pub fn exit(&self) -> ! {
        println!("{}", self.report());
        std::process::exit(self.exit_code())
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
