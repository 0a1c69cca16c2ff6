//! Transport seam consumed by the driver.
//!
//! The driver does not open sockets itself. A [`Connector`] turns a
//! [`ServerAddress`] into a [`Channel`]: an already framed, duplex message
//! stream (typically a WebSocket). Messages arrive whole; the driver only
//! dispatches on the [`Message`] kind before parsing text or binary payloads.
//!
//! ```text
//! Session
//!   └── Box<dyn Channel>
//!         ├── send(Message)
//!         ├── receive() -> Option<Message>   (None = closed)
//!         └── close()
//! ```

use async_trait::async_trait;
use bytes::Bytes;

use super::error::TransportResult;
use crate::driver::ServerAddress;

/// Close frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    /// Close status code
    pub code: u16,
    /// Close reason
    pub reason: String,
}

impl CloseFrame {
    /// Create a close frame.
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

/// A whole message as delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Text frame (JSON payload)
    Text(String),
    /// Binary frame (optionally mime-prefixed JSON payload)
    Binary(Bytes),
    /// Keepalive ping
    Ping(Bytes),
    /// Keepalive pong
    Pong(Bytes),
    /// Close frame, with or without a status payload
    Close(Option<CloseFrame>),
}

impl Message {
    /// Get message name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Text(_) => "TEXT",
            Message::Binary(_) => "BINARY",
            Message::Ping(_) => "PING",
            Message::Pong(_) => "PONG",
            Message::Close(_) => "CLOSE",
        }
    }
}

/// Duplex message channel to a single server.
#[async_trait]
pub trait Channel: Send {
    /// Send a message.
    async fn send(&mut self, message: Message) -> TransportResult<()>;

    /// Receive the next message. `Ok(None)` means the channel is closed.
    async fn receive(&mut self) -> TransportResult<Option<Message>>;

    /// Close the channel.
    async fn close(&mut self) -> TransportResult<()>;
}

/// Opens channels to a server.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a new channel to `address`.
    async fn open(&self, address: &ServerAddress) -> TransportResult<Box<dyn Channel>>;
}
