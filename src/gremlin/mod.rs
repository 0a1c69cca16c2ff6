//! # Gremlin Server Protocol
//!
//! Low-level implementation of the Gremlin Server WebSocket protocol.
//!
//! ## Overview
//!
//! Requests are JSON envelopes carrying a script and a request id. The server
//! answers with one or more response frames; `206` frames are continuations
//! of the same result and the stream ends with a terminal status. This module
//! provides:
//!
//! - **Messages** - Request/response envelopes and status codes
//! - **GraphSON** - Tagged value decoding into driver values
//! - **Transport** - Frame and channel abstraction over the WebSocket
//!
//! ## Submodules
//!
//! - [`message`] - Request and response envelopes
//! - [`graphson`] - GraphSON 3.0 decoding
//! - [`transport`] - Channel and connector traits
//! - [`error`] - Transport error types
//!
//! ## Note
//!
//! Most users should use the high-level [`crate::driver`] module instead of
//! interacting with the protocol directly.

pub mod error;
pub mod graphson;
pub mod message;
pub mod transport;

pub use error::{TransportError, TransportResult};
pub use graphson::{decode, GraphSONDecoder, TaggedValue};
pub use message::{
    sasl_plain, MessageFormat, RequestArgs, RequestMessage, RequestOp, ResponseCode,
    ResponseMessage, ResponseResult, ResponseStatus, MIME_TYPE,
};
pub use transport::{Channel, CloseFrame, Connector, Message};
