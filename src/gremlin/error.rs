//! Gremlin transport and framing error types.

use std::fmt;
use std::io;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-level errors.
///
/// These describe failures of the duplex message channel itself, not
/// failures reported by the server through a response status.
#[derive(Debug)]
pub enum TransportError {
    /// I/O error
    Io(io::Error),

    /// Channel could not be established
    Connection(String),

    /// Channel was closed (by the peer or locally)
    ConnectionClosed,

    /// Outbound message could not be written
    Send(String),

    /// Envelope could not be serialized or parsed
    Serialization(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Io(e) => write!(f, "I/O error: {}", e),
            TransportError::Connection(msg) => write!(f, "Connection error: {}", msg),
            TransportError::ConnectionClosed => write!(f, "Connection closed"),
            TransportError::Send(msg) => write!(f, "Send failed: {}", msg),
            TransportError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl TransportError {
    /// Whether the error leaves the channel unusable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TransportError::Serialization(_))
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        TransportError::Io(err)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Serialization(err.to_string())
    }
}
