//! Structured error types for pagectl-core.
//!
//! The check suite turns most of these into scored failures instead of
//! propagating them; the CLI only sees `Config` errors and whatever the
//! caller chooses to bubble up with `anyhow`.

use thiserror::Error;

/// Main error type for requests against the products API
#[derive(Error, Debug)]
pub enum CheckError {
    /// Network unreachable, refused connection or timeout
    #[error("connection to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response carried a status the caller did not expect
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// Body could not be read as JSON
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Required JSON key absent or of the wrong type
    #[error("missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Configuration error
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for pagectl-core operations
pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    pub fn connection(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Connection {
            url: url.into(),
            source,
        }
    }

    pub fn unexpected_status(url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status,
        }
    }

    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True when the server was never reached
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
