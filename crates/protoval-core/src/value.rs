//! # Runtime Values
//!
//! `Value` is the candidate checked against a message definition. It keeps
//! two map shapes apart: a `Record` is a plain string-keyed record (what a
//! JSON object becomes), while a `Map` is an ordered collection of
//! key/value pairs whose keys may be any value, including messages.
//!
//! `Null` is the absence marker. A `Number` holding NaN is also treated as
//! absent; every other value, including `0`, `false`, `""`, and empty
//! collections, counts as present.

use std::collections::BTreeMap;

/// A dynamically-typed value to validate.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence marker.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Binary buffer.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Plain string-keyed record.
    Record(BTreeMap<String, Value>),
    /// Ordered key/value collection with arbitrary keys.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Build a `Bytes` value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Build a `Record` from string keys and convertible values.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an ordered `Map` from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this value counts as "defined" for presence checks.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Number(n) => !n.is_nan(),
            _ => true,
        }
    }

    /// Read a field of a `Record`. Any other shape has no fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Self::Record(record) => record.get(field),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Length of sized values: characters of a string, bytes of a buffer,
    /// elements of a list. Records, maps, and scalars have no length.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Bytes(b) => Some(b.len()),
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Short name of the value's shape, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// JSON objects become plain records; JSON has no ordered-map or binary shape.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// YAML mappings whose keys are all strings become records. A mapping with
/// any non-string key becomes an ordered `Map`, preserving document order.
/// Tags are ignored.
impl From<serde_yaml::Value> for Value {
    fn from(yaml: serde_yaml::Value) -> Self {
        match yaml {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(seq) => {
                Self::List(seq.into_iter().map(Self::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                if mapping.keys().all(serde_yaml::Value::is_string) {
                    Self::Record(
                        mapping
                            .into_iter()
                            .filter_map(|(k, v)| match k {
                                serde_yaml::Value::String(k) => Some((k, Self::from(v))),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    Self::Map(
                        mapping
                            .into_iter()
                            .map(|(k, v)| (Self::from(k), Self::from(v)))
                            .collect(),
                    )
                }
            }
            serde_yaml::Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}
