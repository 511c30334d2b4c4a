//! Shared error type across roomcast crates.

use thiserror::Error;

/// Stable error classification (matchable without parsing messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Event name is reserved by the receiving servers.
    ReservedEvent,
    /// Payload could not be serialized.
    Encode,
    /// The pub/sub transport rejected or failed the publish.
    Transport,
    /// Invalid emitter configuration.
    BadConfig,
}

impl ErrorKind {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ReservedEvent => "RESERVED_EVENT",
            ErrorKind::Encode => "ENCODE",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::BadConfig => "BAD_CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, EmitterError>;

/// Unified error type used by core and emitter.
#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("{0} is a reserved event name")]
    ReservedEvent(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("publish failed: {0}")]
    Transport(String),
    #[error("bad config: {0}")]
    BadConfig(String),
}

impl EmitterError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EmitterError::ReservedEvent(_) => ErrorKind::ReservedEvent,
            EmitterError::Encode(_) => ErrorKind::Encode,
            EmitterError::Transport(_) => ErrorKind::Transport,
            EmitterError::BadConfig(_) => ErrorKind::BadConfig,
        }
    }
}
