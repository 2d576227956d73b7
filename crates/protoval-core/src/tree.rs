//! # Schema Tree
//!
//! The parsed form of a `.proto` file, as delivered by an external schema
//! parser. The shape follows the JSON emitted by the common JavaScript
//! protocol-buffer schema parsers:
//!
//! ```json
//! {
//!   "package": null,
//!   "imports": [],
//!   "enums": [{"name": "Kind", "values": {"ONE": 1, "TWO": {"value": 2}}}],
//!   "messages": [{
//!     "name": "Basic",
//!     "fields": [
//!       {"name": "foo", "type": "string", "tag": 1, "required": true},
//!       {"name": "tags", "type": "map", "map": {"from": "string", "to": "int32"}}
//!     ],
//!     "messages": [],
//!     "enums": []
//!   }]
//! }
//! ```
//!
//! The tree is read-only input. It is not checked for correctness; type
//! names spelled in fields are resolved later by the validation engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root of a parsed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaTree {
    /// Declared package. Not applied to type ids.
    pub package: Option<String>,
    /// Other schema files this one imports, relative to its own location.
    pub imports: Vec<String>,
    pub messages: Vec<MessageDef>,
    pub enums: Vec<EnumDef>,
}

/// A message definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

/// A field within a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Primitive type name, or a message/enum name to resolve.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub tag: Option<i64>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub repeated: bool,
    #[serde(default)]
    pub oneof: Option<String>,
    #[serde(default)]
    pub map: Option<MapDef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: BTreeMap<String, OptionValue>,
}

/// Key and value types of a `map<K, V>` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDef {
    pub from: String,
    pub to: String,
}

/// An enum definition. Enums may carry nested declarations like messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    #[serde(default)]
    pub values: EnumValues,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

/// A declared enum literal and its numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumLiteral {
    pub name: String,
    pub value: i64,
}

/// Enum literals in declaration order.
///
/// Serialized as a map from literal to number. Deserialization also accepts
/// the detailed form `{"value": n, "options": {...}}` for each literal and
/// keeps the order the entries appear in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValues(Vec<EnumLiteral>);

impl EnumValues {
    pub fn new(literals: Vec<EnumLiteral>) -> Self {
        Self(literals)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumLiteral> {
        self.0.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|l| l.name == name)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.iter().find(|l| l.name == name).map(|l| l.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for EnumValues {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| EnumLiteral {
                    name: name.into(),
                    value,
                })
                .collect(),
        )
    }
}

impl Serialize for EnumValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for literal in &self.0 {
            map.serialize_entry(&literal.name, &literal.value)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLiteral {
    Plain(i64),
    Detailed { value: i64 },
}

impl<'de> Deserialize<'de> for EnumValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LiteralsVisitor;

        impl<'de> Visitor<'de> for LiteralsVisitor {
            type Value = EnumValues;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from enum literal to number")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<EnumValues, E> {
                Ok(EnumValues::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EnumValues, A::Error> {
                let mut literals = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, raw)) = access.next_entry::<String, RawLiteral>()? {
                    let value = match raw {
                        RawLiteral::Plain(v) | RawLiteral::Detailed { value: v } => v,
                    };
                    literals.push(EnumLiteral { name, value });
                }
                Ok(EnumValues(literals))
            }
        }

        deserializer.deserialize_any(LiteralsVisitor)
    }
}

/// A field option value as written in the schema.
///
/// Options are checked numerically; the original spelling is kept for
/// error messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    /// Numeric coercion. Text is parsed as a decimal number; booleans are 0/1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            // Integral values print without a fractional part.
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
