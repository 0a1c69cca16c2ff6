//! Gremlin request messages.
//!
//! Request messages are sent from the client to the server.

use base64::Engine;
use bytes::{BufMut, BytesMut};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use super::{op, MIME_TYPE, SASL_MECHANISM_PLAIN};
use crate::gremlin::error::{TransportError, TransportResult};
use crate::gremlin::graphson::{tag, tagged};
use crate::gremlin::transport::Message;

/// How request envelopes are framed on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// JSON in a text frame
    #[default]
    Text,
    /// Binary frame: mime length byte, mime type, JSON payload
    Binary,
}

/// Request operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOp {
    /// Script evaluation
    Eval,
    /// SASL challenge response
    Authentication,
}

impl RequestOp {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOp::Eval => op::EVAL,
            RequestOp::Authentication => op::AUTHENTICATION,
        }
    }
}

/// Request arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestArgs {
    /// Script to evaluate (eval only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gremlin: Option<String>,
    /// Script language (eval only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Base64 SASL payload (authentication only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sasl: Option<String>,
    /// SASL mechanism (authentication only)
    #[serde(rename = "saslMechanism", skip_serializing_if = "Option::is_none")]
    pub sasl_mechanism: Option<String>,
}

/// A request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage {
    /// Request id, echoed by every response frame
    pub request_id: Uuid,
    /// Operation
    pub op: RequestOp,
    /// Server-side processor
    pub processor: String,
    /// Arguments
    pub args: RequestArgs,
}

impl RequestMessage {
    /// Create an eval request with a fresh request id.
    pub fn eval(
        script: impl Into<String>,
        processor: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            op: RequestOp::Eval,
            processor: processor.into(),
            args: RequestArgs {
                gremlin: Some(script.into()),
                language: Some(language.into()),
                ..Default::default()
            },
        }
    }

    /// Create an authentication request answering the challenge for `request_id`.
    pub fn authentication(
        request_id: Uuid,
        processor: impl Into<String>,
        username: &str,
        password: &str,
    ) -> Self {
        Self {
            request_id,
            op: RequestOp::Authentication,
            processor: processor.into(),
            args: RequestArgs {
                sasl: Some(sasl_plain(username, password)),
                sasl_mechanism: Some(SASL_MECHANISM_PLAIN.to_string()),
                ..Default::default()
            },
        }
    }

    /// Get the script, if this is an eval request.
    pub fn script(&self) -> Option<&str> {
        self.args.gremlin.as_deref()
    }

    /// Convert to the GraphSON envelope.
    pub fn to_json(&self) -> TransportResult<JsonValue> {
        Ok(json!({
            "requestId": tagged(tag::UUID, JsonValue::String(self.request_id.to_string())),
            "op": self.op.as_str(),
            "processor": self.processor,
            "args": serde_json::to_value(&self.args)?,
        }))
    }

    /// Serialize into a transport message.
    pub fn to_message(&self, format: MessageFormat) -> TransportResult<Message> {
        let payload = serde_json::to_vec(&self.to_json()?)?;

        match format {
            MessageFormat::Text => {
                let text = String::from_utf8(payload)
                    .map_err(|e| TransportError::Serialization(e.to_string()))?;
                Ok(Message::Text(text))
            }
            MessageFormat::Binary => {
                let mut buf = BytesMut::with_capacity(1 + MIME_TYPE.len() + payload.len());
                buf.put_u8(MIME_TYPE.len() as u8);
                buf.put_slice(MIME_TYPE.as_bytes());
                buf.put_slice(&payload);
                Ok(Message::Binary(buf.freeze()))
            }
        }
    }
}

/// Build the SASL PLAIN payload: base64 of `"\0" + username + "\0" + password`.
pub fn sasl_plain(username: &str, password: &str) -> String {
    let raw = format!("\0{}\0{}", username, password);
    base64::engine::general_purpose::STANDARD.encode(raw.as_bytes())
}
