//! GraphSON wire types.

use serde_json::{Map as JsonMap, Value as JsonValue};

/// Key holding the type tag of a tagged value.
pub const TYPE_KEY: &str = "@type";

/// Key holding the payload of a tagged value.
pub const VALUE_KEY: &str = "@value";

static NULL: JsonValue = JsonValue::Null;

/// GraphSON 3.0 type tags.
pub mod tag {
    /// Ordered list
    pub const LIST: &str = "g:List";
    /// Duplicate-free collection
    pub const SET: &str = "g:Set";
    /// Map as alternating key/value list
    pub const MAP: &str = "g:Map";
    /// 32-bit integer
    pub const INT32: &str = "g:Int32";
    /// 64-bit integer (numeric or string encoded)
    pub const INT64: &str = "g:Int64";
    /// 64-bit float
    pub const DOUBLE: &str = "g:Double";
    /// 32-bit float
    pub const FLOAT: &str = "g:Float";
    /// UUID string
    pub const UUID: &str = "g:UUID";
    /// Date (epoch based)
    pub const DATE: &str = "g:Date";
    /// Timestamp (epoch based)
    pub const TIMESTAMP: &str = "g:Timestamp";
    /// Vertex
    pub const VERTEX: &str = "g:Vertex";
    /// Vertex property
    pub const VERTEX_PROPERTY: &str = "g:VertexProperty";
    /// Edge
    pub const EDGE: &str = "g:Edge";
    /// Edge or meta property
    pub const PROPERTY: &str = "g:Property";
    /// Traversal path
    pub const PATH: &str = "g:Path";
    /// Token (id, label, key, value)
    pub const T: &str = "g:T";
    /// Direction (OUT, IN, BOTH)
    pub const DIRECTION: &str = "g:Direction";
    /// Bulked set as alternating value/count list
    pub const BULK_SET: &str = "g:BulkSet";
    /// Traverser with bulk
    pub const TRAVERSER: &str = "g:Traverser";
}

/// A tagged wire value: `{"@type": tag, "@value": value}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedValue<'a> {
    /// Namespaced type tag, e.g. `g:Int64`
    pub tag: &'a str,
    /// Untagged payload
    pub value: &'a JsonValue,
}

impl<'a> TaggedValue<'a> {
    /// View `json` as a tagged value. Returns `None` for bare values.
    pub fn from_json(json: &'a JsonValue) -> Option<Self> {
        let object = json.as_object()?;
        let tag = object.get(TYPE_KEY)?.as_str()?;
        let value = object.get(VALUE_KEY).unwrap_or(&NULL);
        Some(Self { tag, value })
    }

    /// Check the tag.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// Build a tagged value.
pub fn tagged(tag: &str, value: JsonValue) -> JsonValue {
    let mut object = JsonMap::with_capacity(2);
    object.insert(TYPE_KEY.to_string(), JsonValue::String(tag.to_string()));
    object.insert(VALUE_KEY.to_string(), value);
    JsonValue::Object(object)
}

/// Strip a tag if present, returning the payload; bare values are returned as is.
pub fn untag(json: &JsonValue) -> &JsonValue {
    match TaggedValue::from_json(json) {
        Some(tagged) => tagged.value,
        None => json,
    }
}
