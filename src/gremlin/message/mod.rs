//! Gremlin Server message types.
//!
//! This module implements the request and response envelopes of the
//! Gremlin Server WebSocket protocol (GraphSON 3.0 serialization).

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

/// GraphSON 3.0 mime type, used as the binary frame prefix.
pub const MIME_TYPE: &str = "application/vnd.gremlin-v3.0+json";

/// Default request processor.
pub const DEFAULT_PROCESSOR: &str = "traversal";

/// Script language sent with every eval request.
pub const DEFAULT_LANGUAGE: &str = "gremlin-groovy";

/// SASL mechanism used for the credential exchange.
pub const SASL_MECHANISM_PLAIN: &str = "PLAIN";

/// Request operation names.
pub mod op {
    /// Evaluate a script
    pub const EVAL: &str = "eval";
    /// Answer a SASL challenge
    pub const AUTHENTICATION: &str = "authentication";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ops() {
        assert_eq!(op::EVAL, "eval");
        assert_eq!(op::AUTHENTICATION, "authentication");
    }

    #[test]
    fn test_mime_type_fits_prefix_byte() {
        assert!(MIME_TYPE.len() < u8::MAX as usize);
    }
}
