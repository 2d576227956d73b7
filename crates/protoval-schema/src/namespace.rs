//! # Namespace Index
//!
//! Walks a schema tree once, depth-first, and assigns every message and
//! enum a fully-qualified dotted id reflecting its nesting: `Parent`,
//! `Parent.Child`, `Parent.Child.Kind`. The result is two flat maps, built
//! once and never mutated afterwards.
//!
//! At each level enums are indexed before messages. Enums may hold nested
//! declarations and are descended into the same way messages are.
//!
//! Fields are classified while indexing: each becomes a [`FieldPlan`] whose
//! [`FieldKind`] says whether it is a map, a repeated field, or a scalar, with
//! its option constraints already parsed.
//!
//! Ids are expected to be unique. If a malformed tree declares the same id
//! twice, the first declaration is kept and a warning is logged.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use protoval_core::{EnumDef, EnumLiteral, FieldDef, MessageDef, SchemaTree};

use crate::options::Constraints;

/// How a field's value is shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A single value of `type_name`.
    Scalar { type_name: String },
    /// A list whose elements are of `type_name`.
    Repeated { type_name: String },
    /// A map from `key` type to `value` type.
    Map { key: String, value: String },
}

/// A field, classified once at index time.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub oneof: Option<String>,
    /// Constraints from the field's own options.
    pub constraints: Constraints,
    /// Constraints from `item`-prefixed options, applied to list elements.
    pub item_constraints: Constraints,
}

impl FieldPlan {
    fn from_def(field: &FieldDef) -> Self {
        let kind = match (&field.map, field.repeated) {
            (Some(map), _) => FieldKind::Map {
                key: map.from.clone(),
                value: map.to.clone(),
            },
            (None, true) => FieldKind::Repeated {
                type_name: field.type_name.clone(),
            },
            (None, false) => FieldKind::Scalar {
                type_name: field.type_name.clone(),
            },
        };

        Self {
            name: field.name.clone(),
            kind,
            required: field.required,
            oneof: field.oneof.clone(),
            constraints: Constraints::from_options(&field.options),
            item_constraints: if field.repeated {
                Constraints::items_from_options(&field.options)
            } else {
                Constraints::NONE
            },
        }
    }
}

/// An indexed message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageType {
    pub id: String,
    pub name: String,
    pub fields: Vec<FieldPlan>,
}

impl MessageType {
    pub fn field(&self, name: &str) -> Option<&FieldPlan> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An indexed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub id: String,
    pub name: String,
    pub literals: Vec<EnumLiteral>,
}

impl EnumType {
    pub fn contains(&self, literal: &str) -> bool {
        self.literals.iter().any(|l| l.name == literal)
    }

    /// Literal names in declaration order.
    pub fn literal_names(&self) -> Vec<String> {
        self.literals.iter().map(|l| l.name.clone()).collect()
    }
}

/// Flat id -> definition maps for one schema.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    messages: HashMap<String, MessageType>,
    enums: HashMap<String, EnumType>,
}

impl Namespace {
    /// Index every message and enum in `tree`.
    pub fn index(tree: &SchemaTree) -> Self {
        let mut ns = Self::default();
        ns.visit(&tree.enums, &tree.messages, "");
        tracing::debug!(
            messages = ns.messages.len(),
            enums = ns.enums.len(),
            "indexed schema namespace"
        );
        ns
    }

    fn visit(&mut self, enums: &[EnumDef], messages: &[MessageDef], prefix: &str) {
        for def in enums {
            let id = qualify(prefix, &def.name);
            match self.enums.entry(id.clone()) {
                Entry::Occupied(_) => tracing::warn!(id = %id, "duplicate enum id; keeping first"),
                Entry::Vacant(slot) => {
                    slot.insert(EnumType {
                        id: id.clone(),
                        name: def.name.clone(),
                        literals: def.values.iter().cloned().collect(),
                    });
                }
            }
            self.visit(&def.enums, &def.messages, &id);
        }

        for def in messages {
            let id = qualify(prefix, &def.name);
            match self.messages.entry(id.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(id = %id, "duplicate message id; keeping first");
                }
                Entry::Vacant(slot) => {
                    slot.insert(MessageType {
                        id: id.clone(),
                        name: def.name.clone(),
                        fields: def.fields.iter().map(FieldPlan::from_def).collect(),
                    });
                }
            }
            self.visit(&def.enums, &def.messages, &id);
        }
    }

    pub fn message(&self, id: &str) -> Option<&MessageType> {
        self.messages.get(id)
    }

    pub fn enum_type(&self, id: &str) -> Option<&EnumType> {
        self.enums.get(id)
    }

    /// All message ids, sorted.
    pub fn message_ids(&self) -> Vec<&str> {
        sorted_keys(&self.messages)
    }

    /// All enum ids, sorted.
    pub fn enum_ids(&self) -> Vec<&str> {
        sorted_keys(&self.enums)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut ids: Vec<&str> = map.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}
