//! Shared error type across voxrelay crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Publish referenced a sender absent from the presence registry.
    UnregisteredSender,
    /// Poll referenced a receiver absent from the presence registry.
    UnregisteredReceiver,
    /// Invalid input / malformed request.
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::UnregisteredSender => "UNREGISTERED_SENDER",
            ClientCode::UnregisteredReceiver => "UNREGISTERED_RECEIVER",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("sender not registered: {0}")]
    UnregisteredSender(String),
    #[error("receiver not registered: {0}")]
    UnregisteredReceiver(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RelayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RelayError::UnregisteredSender(_) => ClientCode::UnregisteredSender,
            RelayError::UnregisteredReceiver(_) => ClientCode::UnregisteredReceiver,
            RelayError::BadRequest(_) => ClientCode::BadRequest,
            RelayError::Internal(_) => ClientCode::Internal,
        }
    }
}
