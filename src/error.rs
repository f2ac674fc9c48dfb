//! Error types shared across the crate.
//!
//! Gateway failures are `TransportError`s. Operations that can also be
//! declined by the user return `ActionError`, where `UserCancelled` is an
//! outcome rather than a fault.

use thiserror::Error;

/// Failure talking to the remote user resource.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
    /// The response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Classify a reqwest error into the taxonomy used by the screen.
    pub fn from_reqwest(method: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Status {
                method,
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            };
        }
        Self::Network(err.to_string())
    }
}

/// Outcome of a user-initiated operation that did not go through.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Explicit close/cancel or a declined confirmation.
    #[error("cancelled by user")]
    UserCancelled,
}

/// Rejected form field path.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

pub type Result<T, E = TransportError> = std::result::Result<T, E>;
