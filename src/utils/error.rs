//! The `error` module defines the error types used within `courier`.
//!
//! Each concern gets its own enum so callers can match on what went wrong:
//! configuration, transport, sender construction, individual sends,
//! storage and request handling.

use thiserror::Error;

/// Failure to load settings or to resolve a named sender profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("unknown sender profile '{0}'")]
    UnknownProfile(String),

    #[error("sender profile '{profile}' is invalid: {reason}")]
    InvalidProfile { profile: String, reason: String },
}

/// Errors raised by a transport client or one of its handles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("unable to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("connection is closed")]
    Closed,

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("transport I/O failure: {0}")]
    Io(String),

    #[error("failed to encode message: {0}")]
    Encode(String),
}

impl From<tungstenite::Error> for TransportError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                TransportError::Closed
            }
            other => TransportError::Io(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Encode(err.to_string())
    }
}

/// Construction-time failures of a `Sender`.
#[derive(Debug, Error)]
pub enum SenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("broker unreachable: {0}")]
    Connect(#[from] TransportError),
}

/// Why a single `send` did not go out.
///
/// Send failures are never propagated as panics or bubbled errors from the
/// sender itself; they are logged and handed back as this value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("sending is disabled")]
    Disabled,

    #[error("message body is empty")]
    EmptyBody,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures of the person store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage failure: {0}")]
    Db(#[from] sled::Error),

    #[error("corrupt record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Errors surfaced by the person edit handler to its caller.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("id missing for edit operation")]
    MissingId,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
