//! Gremlin response messages.
//!
//! Response messages are sent from the server to the client. A single
//! request may be answered by several frames: zero or more `206` partial
//! frames followed by one terminal frame.

use std::fmt;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::MIME_TYPE;
use crate::gremlin::error::{TransportError, TransportResult};
use crate::gremlin::graphson::TaggedValue;

/// Response status codes understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// 200 - terminal frame with data
    Success,
    /// 204 - terminal frame without data
    NoContent,
    /// 206 - more frames follow
    PartialContent,
    /// 401 - credentials required
    Unauthorized,
    /// 407 - SASL challenge
    Authenticate,
    /// 409 / 498 - request could not be parsed
    MalformedRequest,
    /// 499 - request arguments are invalid
    InvalidRequestArguments,
    /// 500 - server error
    ServerError,
    /// 597 - script evaluation failed
    ScriptEvaluationError,
    /// 598 - server timed out evaluating the request
    ServerTimeout,
    /// 599 - server could not serialize the result
    ServerSerializationError,
}

impl ResponseCode {
    /// Map a raw status code. Unknown codes return `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(ResponseCode::Success),
            204 => Some(ResponseCode::NoContent),
            206 => Some(ResponseCode::PartialContent),
            401 => Some(ResponseCode::Unauthorized),
            407 => Some(ResponseCode::Authenticate),
            409 | 498 => Some(ResponseCode::MalformedRequest),
            499 => Some(ResponseCode::InvalidRequestArguments),
            500 => Some(ResponseCode::ServerError),
            597 => Some(ResponseCode::ScriptEvaluationError),
            598 => Some(ResponseCode::ServerTimeout),
            599 => Some(ResponseCode::ServerSerializationError),
            _ => None,
        }
    }

    /// Check if this code ends the response stream successfully.
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, ResponseCode::Success | ResponseCode::NoContent)
    }

    /// Check if this code asks for credentials.
    pub fn is_challenge(&self) -> bool {
        matches!(self, ResponseCode::Unauthorized | ResponseCode::Authenticate)
    }
}

/// Response status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseStatus {
    /// Raw status code
    pub code: u16,
    /// Server message
    #[serde(default)]
    pub message: Option<String>,
    /// Status attributes
    #[serde(default)]
    pub attributes: Option<JsonValue>,
}

impl ResponseStatus {
    /// Server message, empty if absent.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Response result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseResult {
    /// Tagged payload
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// Result metadata
    #[serde(default)]
    pub meta: Option<JsonValue>,
}

/// A single response frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseMessage {
    /// Request id, plain or `g:UUID` tagged
    #[serde(rename = "requestId", default)]
    pub request_id: Option<JsonValue>,
    /// Status
    pub status: ResponseStatus,
    /// Result
    #[serde(default)]
    pub result: ResponseResult,
}

impl ResponseMessage {
    /// Parse a frame from a text payload.
    pub fn from_text(text: &str) -> TransportResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a frame from a binary payload, stripping a mime prefix if present.
    pub fn from_slice(bytes: &[u8]) -> TransportResult<Self> {
        let payload = strip_mime_prefix(bytes);
        if payload.is_empty() {
            return Err(TransportError::Serialization("Empty response frame".to_string()));
        }
        Ok(serde_json::from_slice(payload)?)
    }

    /// Status code as a known [`ResponseCode`].
    pub fn code(&self) -> Option<ResponseCode> {
        ResponseCode::from_code(self.status.code)
    }

    /// Parsed request id, if present and well formed.
    pub fn request_id(&self) -> Option<Uuid> {
        let raw = self.request_id.as_ref()?;
        let text = match TaggedValue::from_json(raw) {
            Some(tagged) => tagged.value.as_str()?,
            None => raw.as_str()?,
        };
        Uuid::parse_str(text).ok()
    }

    /// Tagged result payload.
    pub fn data(&self) -> Option<&JsonValue> {
        self.result.data.as_ref().filter(|d| !d.is_null())
    }
}

impl fmt::Display for ResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RESPONSE {} {}", self.status.code, self.status.message())
    }
}

fn strip_mime_prefix(bytes: &[u8]) -> &[u8] {
    match bytes.first() {
        Some(&len) if len as usize == MIME_TYPE.len() && bytes.len() > len as usize => {
            let mime = &bytes[1..1 + len as usize];
            if mime == MIME_TYPE.as_bytes() {
                &bytes[1 + len as usize..]
            } else {
                bytes
            }
        }
        _ => bytes,
    }
}
