//! GraphSON decoder.
//!
//! Turns tagged wire values into driver [`Value`]s. Dispatch is a lookup
//! table from type tag to decode function; tags without a handler fall back
//! to a structural conversion of the payload. Decoding never fails: anything
//! unexpected degrades to the closest plain value.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::DateTime;
use serde_json::Value as JsonValue;

use super::types::{tag, untag, TaggedValue};
use crate::driver::types::{Edge, Path, Property, Value, Vertex, VertexProperty};

/// Decode function registered for a type tag. Receives the untagged payload.
pub type DecodeFn = fn(&GraphSONDecoder, &JsonValue) -> Value;

/// Tag-dispatched GraphSON decoder.
#[derive(Clone)]
pub struct GraphSONDecoder {
    handlers: HashMap<String, DecodeFn>,
}

impl GraphSONDecoder {
    /// Create a decoder with the standard GraphSON 3.0 handlers.
    pub fn new() -> Self {
        let mut decoder = Self::empty();
        decoder.register(tag::LIST, decode_list);
        decoder.register(tag::SET, decode_set);
        decoder.register(tag::MAP, decode_map);
        decoder.register(tag::INT32, decode_integer);
        decoder.register(tag::INT64, decode_integer);
        decoder.register(tag::DOUBLE, decode_float);
        decoder.register(tag::FLOAT, decode_float);
        decoder.register(tag::UUID, decode_plain);
        decoder.register(tag::DATE, decode_timestamp);
        decoder.register(tag::TIMESTAMP, decode_timestamp);
        decoder.register(tag::VERTEX, decode_vertex);
        decoder.register(tag::VERTEX_PROPERTY, decode_vertex_property);
        decoder.register(tag::EDGE, decode_edge);
        decoder.register(tag::PROPERTY, decode_property);
        decoder.register(tag::PATH, decode_path);
        decoder.register(tag::T, decode_plain);
        decoder.register(tag::DIRECTION, decode_plain);
        decoder.register(tag::BULK_SET, decode_bulk_set);
        decoder.register(tag::TRAVERSER, decode_traverser);
        decoder
    }

    /// Create a decoder without any handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, handler: DecodeFn) -> Option<DecodeFn> {
        self.handlers.insert(tag.into(), handler)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler(mut self, tag: impl Into<String>, handler: DecodeFn) -> Self {
        self.register(tag, handler);
        self
    }

    /// Check if a handler exists for `tag`.
    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Decode a response's `result.data`. Absent or null data yields `Value::Null`.
    pub fn decode(&self, data: Option<&JsonValue>) -> Value {
        match data {
            Some(json) => self.decode_value(json),
            None => Value::Null,
        }
    }

    /// Decode a single (tagged or bare) wire value.
    pub fn decode_value(&self, json: &JsonValue) -> Value {
        match TaggedValue::from_json(json) {
            Some(tagged) => match self.handlers.get(tagged.tag) {
                Some(handler) => handler(self, tagged.value),
                None => self.decode_bare(tagged.value),
            },
            None => self.decode_bare(json),
        }
    }

    /// Decode a response payload into its result elements.
    ///
    /// Collections contribute their elements, `null` contributes nothing and
    /// any other value contributes itself.
    pub fn decode_results(&self, data: Option<&JsonValue>) -> Vec<Value> {
        match self.decode(data) {
            Value::Null => Vec::new(),
            Value::List(items) | Value::Set(items) => items,
            other => vec![other],
        }
    }

    /// Structural conversion of an untagged value; nested tags are still decoded.
    fn decode_bare(&self, json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => {
                Value::List(items.iter().map(|item| self.decode_value(item)).collect())
            }
            JsonValue::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.decode_value(v)))
                    .collect(),
            ),
        }
    }
}

impl Default for GraphSONDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraphSONDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("GraphSONDecoder").field("tags", &tags).finish()
    }
}

/// Shared decoder with the standard handlers.
pub fn default_decoder() -> &'static GraphSONDecoder {
    static DECODER: OnceLock<GraphSONDecoder> = OnceLock::new();
    DECODER.get_or_init(GraphSONDecoder::new)
}

/// Decode `result.data` with the standard handlers.
pub fn decode(data: Option<&JsonValue>) -> Value {
    default_decoder().decode(data)
}

// ============================================================================
// Handlers
// ============================================================================

fn decode_plain(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    decoder.decode_bare(value)
}

fn decode_list(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.as_array() {
        Some(items) => Value::List(items.iter().map(|item| decoder.decode_value(item)).collect()),
        None => decoder.decode_bare(value),
    }
}

fn decode_set(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    let Some(items) = value.as_array() else {
        return decoder.decode_bare(value);
    };

    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        let decoded = decoder.decode_value(item);
        if !unique.contains(&decoded) {
            unique.push(decoded);
        }
    }
    Value::Set(unique)
}

fn decode_map(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    let Some(items) = value.as_array() else {
        return decoder.decode_bare(value);
    };

    let mut map = HashMap::with_capacity(items.len() / 2);
    for pair in items.chunks(2) {
        let key = match decoder.decode_value(&pair[0]) {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let value = pair.get(1).map(|v| decoder.decode_value(v)).unwrap_or(Value::Null);
        map.insert(key, value);
    }
    Value::Map(map)
}

fn decode_integer(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value {
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => decoder.decode_bare(value),
        },
        JsonValue::String(s) => Value::Integer(s.trim().parse().unwrap_or(0)),
        _ => decoder.decode_bare(value),
    }
}

fn decode_float(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value {
        JsonValue::Number(n) => Value::Float(n.as_f64().unwrap_or_default()),
        JsonValue::String(s) => match s.as_str() {
            "NaN" => Value::Float(f64::NAN),
            "Infinity" => Value::Float(f64::INFINITY),
            "-Infinity" => Value::Float(f64::NEG_INFINITY),
            other => other
                .parse()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::String(s.clone())),
        },
        _ => decoder.decode_bare(value),
    }
}

fn decode_timestamp(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    value
        .as_i64()
        .and_then(DateTime::from_timestamp_micros)
        .map(Value::Timestamp)
        .unwrap_or_else(|| decoder.decode_bare(value))
}

fn decode_vertex(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.as_object() {
        Some(map) => Vertex::from_wire_map(map, decoder).into(),
        None => decoder.decode_bare(value),
    }
}

fn decode_vertex_property(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.as_object() {
        Some(map) => VertexProperty::from_wire_map(map, decoder).into(),
        None => decoder.decode_bare(value),
    }
}

fn decode_edge(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.as_object() {
        Some(map) => Edge::from_wire_map(map, decoder).into(),
        None => decoder.decode_bare(value),
    }
}

fn decode_property(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.as_object() {
        Some(map) => Property::from_wire_map(map, decoder).into(),
        None => decoder.decode_bare(value),
    }
}

fn decode_path(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.as_object() {
        Some(map) => Value::Path(Path::from_wire_map(map, decoder)),
        None => decoder.decode_bare(value),
    }
}

fn decode_bulk_set(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    let Some(items) = value.as_array() else {
        return decoder.decode_bare(value);
    };

    let mut expanded = Vec::new();
    for pair in items.chunks(2) {
        let item = decoder.decode_value(&pair[0]);
        let bulk = pair
            .get(1)
            .and_then(|b| decoder.decode_value(b).as_int())
            .unwrap_or(1)
            .max(0);
        for _ in 0..bulk {
            expanded.push(item.clone());
        }
    }
    Value::List(expanded)
}

fn decode_traverser(decoder: &GraphSONDecoder, value: &JsonValue) -> Value {
    match value.get("value") {
        Some(inner) => decoder.decode_value(inner),
        None => decoder.decode_bare(untag(value)),
    }
}

// ============================================================================
// Tests
// ============================================================================
