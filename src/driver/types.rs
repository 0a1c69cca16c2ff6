//! Driver Types
//!
//! 드라이버에서 사용하는 타입 정의

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::error::{DriverError, DriverResult};
use crate::gremlin::graphson::{tag, GraphSONDecoder, TaggedValue};

// ============================================================================
// Value - 그래프 값
// ============================================================================

/// 그래프 값 타입
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer (i64)
    Integer(i64),
    /// Float (f64)
    Float(f64),
    /// String
    String(String),
    /// List
    List(Vec<Value>),
    /// Set (중복 없음, 순서 유지)
    Set(Vec<Value>),
    /// Map
    Map(HashMap<String, Value>),
    /// Vertex
    Vertex(Box<Vertex>),
    /// Edge
    Edge(Box<Edge>),
    /// VertexProperty
    VertexProperty(Box<VertexProperty>),
    /// Property
    Property(Box<Property>),
    /// Path
    Path(Path),
    /// Timestamp (UTC)
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Null 여부
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Boolean으로 변환
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer로 변환
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Float로 변환
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// String으로 변환
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// List 또는 Set으로 변환
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) | Value::Set(l) => Some(l),
            _ => None,
        }
    }

    /// Map으로 변환
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Vertex로 변환
    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            Value::Vertex(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// Edge로 변환
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Value::Edge(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// VertexProperty로 변환
    pub fn as_vertex_property(&self) -> Option<&VertexProperty> {
        match self {
            Value::VertexProperty(p) => Some(p.as_ref()),
            _ => None,
        }
    }

    /// Property로 변환
    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Value::Property(p) => Some(p.as_ref()),
            _ => None,
        }
    }

    /// Path로 변환
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Timestamp로 변환
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// 타입 이름
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::Map(_) => "Map",
            Value::Vertex(_) => "Vertex",
            Value::Edge(_) => "Edge",
            Value::VertexProperty(_) => "VertexProperty",
            Value::Property(_) => "Property",
            Value::Path(_) => "Path",
            Value::Timestamp(_) => "Timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::List(l) => write!(f, "[{} items]", l.len()),
            Value::Set(s) => write!(f, "{{{} items}}", s.len()),
            Value::Map(m) => write!(f, "{{{} entries}}", m.len()),
            Value::Vertex(v) => write!(f, "{}", v),
            Value::Edge(e) => write!(f, "{}", e),
            Value::VertexProperty(p) => write!(f, "{}", p),
            Value::Property(p) => write!(f, "{}", p),
            Value::Path(p) => write!(f, "{}", p),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

// From implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(v: HashMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<Vertex> for Value {
    fn from(v: Vertex) -> Self {
        Value::Vertex(Box::new(v))
    }
}

impl From<Edge> for Value {
    fn from(v: Edge) -> Self {
        Value::Edge(Box::new(v))
    }
}

impl From<VertexProperty> for Value {
    fn from(v: VertexProperty) -> Self {
        Value::VertexProperty(Box::new(v))
    }
}

impl From<Property> for Value {
    fn from(v: Property) -> Self {
        Value::Property(Box::new(v))
    }
}

impl From<Path> for Value {
    fn from(v: Path) -> Self {
        Value::Path(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

// ============================================================================
// Wire map helpers
// ============================================================================

fn wire_id(map: &JsonMap<String, JsonValue>, key: &str, decoder: &GraphSONDecoder) -> Value {
    map.get(key).map(|v| decoder.decode_value(v)).unwrap_or(Value::Null)
}

fn wire_label(map: &JsonMap<String, JsonValue>, key: &str) -> String {
    map.get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

/// 속성 값 맵 디코딩 (g:Property는 값만 꺼냄)
fn wire_properties(map: &JsonMap<String, JsonValue>, decoder: &GraphSONDecoder) -> HashMap<String, Value> {
    map.iter()
        .map(|(key, raw)| {
            let value = match decoder.decode_value(raw) {
                Value::Property(p) => p.value,
                other => other,
            };
            (key.clone(), value)
        })
        .collect()
}

// ============================================================================
// Vertex - 정점
// ============================================================================

/// 그래프 정점
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// 정점 ID (숫자 또는 문자열)
    pub id: Value,
    /// 레이블
    pub label: String,
    /// 속성 (키별 다중 값)
    #[serde(default)]
    pub properties: HashMap<String, Vec<VertexProperty>>,
}

impl Vertex {
    /// 새 정점 생성
    pub fn new(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: HashMap::new(),
        }
    }

    /// 속성 추가
    pub fn with_property(mut self, property: VertexProperty) -> Self {
        self.properties
            .entry(property.label.clone())
            .or_default()
            .push(property);
        self
    }

    /// GraphSON 맵에서 생성
    ///
    /// `properties`가 없으면 빈 맵. 태그 없는 속성 원소도 허용합니다.
    pub fn from_wire_map(map: &JsonMap<String, JsonValue>, decoder: &GraphSONDecoder) -> Self {
        let mut properties: HashMap<String, Vec<VertexProperty>> = HashMap::new();

        if let Some(JsonValue::Object(wire)) = map.get("properties") {
            for (key, raw) in wire {
                let elements = match crate::gremlin::graphson::untag(raw) {
                    JsonValue::Array(items) => items.iter().collect(),
                    single => vec![single],
                };
                let list = properties.entry(key.clone()).or_default();
                for element in elements {
                    list.push(VertexProperty::from_wire_element(key, element, decoder));
                }
            }
        }

        Self {
            id: wire_id(map, "id", decoder),
            label: wire_label(map, "label"),
            properties,
        }
    }

    /// 첫 번째 속성
    pub fn property(&self, key: &str) -> Option<&VertexProperty> {
        self.properties.get(key).and_then(|list| list.first())
    }

    /// 첫 번째 속성 값
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.property(key).map(|p| &p.value)
    }

    /// 속성 값 가져오기 (타입 변환)
    pub fn get_as<T: TryFrom<Value, Error = DriverError>>(&self, key: &str) -> DriverResult<T> {
        self.value(key)
            .cloned()
            .ok_or_else(|| DriverError::type_conversion(format!("Property '{}' not found", key)))
            .and_then(|v| T::try_from(v))
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

// ============================================================================
// VertexProperty - 정점 속성
// ============================================================================

/// 정점 속성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexProperty {
    /// 속성 ID
    pub id: Value,
    /// 레이블 (속성 키)
    pub label: String,
    /// 값
    pub value: Value,
    /// 메타 속성
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, Value>>,
}

impl VertexProperty {
    /// 새 정점 속성 생성
    pub fn new(id: impl Into<Value>, label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            properties: None,
        }
    }

    /// GraphSON 맵에서 생성
    pub fn from_wire_map(map: &JsonMap<String, JsonValue>, decoder: &GraphSONDecoder) -> Self {
        let properties = match map.get("properties") {
            Some(JsonValue::Object(meta)) => Some(wire_properties(meta, decoder)),
            _ => None,
        };

        Self {
            id: wire_id(map, "id", decoder),
            label: wire_label(map, "label"),
            value: wire_id(map, "value", decoder),
            properties,
        }
    }

    /// 정점의 속성 목록 원소 하나를 디코딩
    fn from_wire_element(key: &str, element: &JsonValue, decoder: &GraphSONDecoder) -> Self {
        let body = match TaggedValue::from_json(element) {
            Some(tagged) if tagged.is(tag::VERTEX_PROPERTY) => tagged.value,
            Some(_) => return Self::new(Value::Null, key, decoder.decode_value(element)),
            None => element,
        };

        match body.as_object() {
            Some(map) => {
                let mut property = Self::from_wire_map(map, decoder);
                if property.label.is_empty() {
                    property.label = key.to_string();
                }
                property
            }
            None => Self::new(Value::Null, key, decoder.decode_value(body)),
        }
    }

    /// 메타 속성 가져오기
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}

impl fmt::Display for VertexProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vp[{}->{}]", self.label, self.value)
    }
}

// ============================================================================
// Edge - 간선
// ============================================================================

/// 간선 끝점 참조
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeVertex {
    /// 정점 ID
    pub id: Value,
    /// 정점 레이블
    pub label: String,
}

/// 그래프 간선
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 간선 ID
    pub id: Value,
    /// 레이블
    pub label: String,
    /// 들어오는 정점 (head)
    pub in_vertex: EdgeVertex,
    /// 나가는 정점 (tail)
    pub out_vertex: EdgeVertex,
    /// 속성
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl Edge {
    /// GraphSON 맵에서 생성
    pub fn from_wire_map(map: &JsonMap<String, JsonValue>, decoder: &GraphSONDecoder) -> Self {
        let properties = match map.get("properties") {
            Some(JsonValue::Object(wire)) => wire_properties(wire, decoder),
            _ => HashMap::new(),
        };

        Self {
            id: wire_id(map, "id", decoder),
            label: wire_label(map, "label"),
            in_vertex: EdgeVertex {
                id: wire_id(map, "inV", decoder),
                label: wire_label(map, "inVLabel"),
            },
            out_vertex: EdgeVertex {
                id: wire_id(map, "outV", decoder),
                label: wire_label(map, "outVLabel"),
            },
            properties,
        }
    }

    /// 속성 가져오기
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e[{}][{}-{}->{}]",
            self.id, self.out_vertex.id, self.label, self.in_vertex.id
        )
    }
}

// ============================================================================
// Property - 간선/메타 속성
// ============================================================================

/// 키-값 속성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// 키
    pub key: String,
    /// 값
    pub value: Value,
}

impl Property {
    /// GraphSON 맵에서 생성
    pub fn from_wire_map(map: &JsonMap<String, JsonValue>, decoder: &GraphSONDecoder) -> Self {
        Self {
            key: wire_label(map, "key"),
            value: wire_id(map, "value", decoder),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p[{}->{}]", self.key, self.value)
    }
}

// ============================================================================
// Path - 경로
// ============================================================================

/// 순회 경로
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// 각 위치의 레이블
    pub labels: Vec<Vec<String>>,
    /// 경로 객체
    pub objects: Vec<Value>,
}

impl Path {
    /// GraphSON 맵에서 생성
    pub fn from_wire_map(map: &JsonMap<String, JsonValue>, decoder: &GraphSONDecoder) -> Self {
        let labels = match map.get("labels").map(|v| decoder.decode_value(v)) {
            Some(Value::List(steps)) | Some(Value::Set(steps)) => steps
                .iter()
                .map(|step| {
                    step.as_list()
                        .unwrap_or_default()
                        .iter()
                        .filter_map(|l| l.as_str().map(str::to_string))
                        .collect()
                })
                .collect(),
            _ => Vec::new(),
        };

        let objects = match map.get("objects").map(|v| decoder.decode_value(v)) {
            Some(Value::List(items)) | Some(Value::Set(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        };

        Self { labels, objects }
    }

    /// 경로 길이
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// 빈 경로 여부
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// 레이블로 객체 찾기
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|labels| labels.iter().any(|l| l == label))
            .and_then(|i| self.objects.get(i))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objects: Vec<String> = self.objects.iter().map(|o| o.to_string()).collect();
        write!(f, "path[{}]", objects.join(", "))
    }
}

// ============================================================================
// TryFrom implementations
// ============================================================================

macro_rules! try_from_value {
    ($($target:ty => $name:literal, |$v:ident| $body:expr;)*) => {
        $(
            impl TryFrom<Value> for $target {
                type Error = DriverError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let type_name = value.type_name();
                    let converted: Option<$target> = match value {
                        $v => $body,
                    };
                    converted.ok_or_else(|| {
                        DriverError::type_conversion(format!(
                            "Cannot convert {} to {}",
                            type_name, $name
                        ))
                    })
                }
            }
        )*
    };
}

try_from_value! {
    bool => "bool", |v| v.as_bool();
    i64 => "i64", |v| v.as_int();
    f64 => "f64", |v| v.as_float();
    String => "String", |v| match v { Value::String(s) => Some(s), _ => None };
    Vec<Value> => "Vec", |v| match v { Value::List(l) | Value::Set(l) => Some(l), _ => None };
    DateTime<Utc> => "DateTime", |v| v.as_timestamp();
    Vertex => "Vertex", |v| match v { Value::Vertex(x) => Some(*x), _ => None };
    Edge => "Edge", |v| match v { Value::Edge(x) => Some(*x), _ => None };
    VertexProperty => "VertexProperty", |v| match v { Value::VertexProperty(x) => Some(*x), _ => None };
    Path => "Path", |v| match v { Value::Path(p) => Some(p), _ => None };
}

// ============================================================================
// Tests
// ============================================================================
