//! # Validation Engine
//!
//! Walks a message definition and a candidate [`Value`] in lock-step and
//! reports the first violation, in field declaration order, as a
//! path-qualified [`ValidationError`].
//!
//! For each field of the message:
//!
//! 1. The field is present when the record holds a value that is neither
//!    `Null` nor NaN.
//! 2. A present field in a oneof group fails if another field of the group
//!    was already present on this message value.
//! 3. Map fields accept an ordered `Map`, or a plain `Record` when the key
//!    type is `string`. Keys and values are checked entry by entry; field
//!    options apply to the values.
//! 4. Repeated fields must hold a `List`. The field's own length options
//!    apply to the list, `item`-prefixed options to each element.
//! 5. Scalar fields are checked once with the field's options.
//! 6. An absent required field fails. Absent optional fields are skipped.
//!
//! Nested messages are validated recursively; their errors propagate
//! unchanged, already qualified with the nested message's id.
//!
//! ## Thread Safety
//!
//! `ProtoValidator` is `Send + Sync`. The namespace is built once in the
//! constructor and only read afterwards; each `validate` call keeps its
//! own transient state.

use std::collections::HashSet;
use std::path::Path;

use protoval_core::{PrimitiveTable, SchemaTree, ValidationError, Value, TEXT_TYPE};

use crate::load::{SchemaLoadError, SchemaLoader, SchemaSource};
use crate::namespace::{EnumType, FieldKind, FieldPlan, MessageType, Namespace};
use crate::options::Constraints;
use crate::resolve::{resolve, ResolvedType};

/// The message to validate against: a type name resolved from the root
/// scope, or an already-indexed message.
#[derive(Debug, Clone, Copy)]
pub enum MessageRef<'a> {
    Name(&'a str),
    Type(&'a MessageType),
}

impl<'a> From<&'a str> for MessageRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for MessageRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a MessageType> for MessageRef<'a> {
    fn from(message: &'a MessageType) -> Self {
        Self::Type(message)
    }
}

/// Validates values against the messages of one schema.
#[derive(Debug, Clone)]
pub struct ProtoValidator {
    namespace: Namespace,
    primitives: PrimitiveTable,
    package: Option<String>,
}

impl ProtoValidator {
    /// Index `tree` with the standard primitive table.
    pub fn new(tree: &SchemaTree) -> Self {
        Self::with_primitives(tree, PrimitiveTable::standard())
    }

    /// Index `tree` with a custom primitive table.
    pub fn with_primitives(tree: &SchemaTree, primitives: PrimitiveTable) -> Self {
        Self {
            namespace: Namespace::index(tree),
            primitives,
            package: tree.package.clone(),
        }
    }

    /// Load the schema tree at `path` (following its imports) and index it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLoadError`] if the file or one of its imports cannot
    /// be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        Self::from_source(&SchemaLoader::new(), path.as_ref())
    }

    /// Load a schema tree through any [`SchemaSource`] and index it.
    pub fn from_source(
        source: &impl SchemaSource,
        location: &Path,
    ) -> Result<Self, SchemaLoadError> {
        let tree = source.load(location)?;
        Ok(Self::new(&tree))
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn primitives(&self) -> &PrimitiveTable {
        &self.primitives
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn message(&self, id: &str) -> Option<&MessageType> {
        self.namespace.message(id)
    }

    pub fn enum_type(&self, id: &str) -> Option<&EnumType> {
        self.namespace.enum_type(id)
    }

    pub fn message_ids(&self) -> Vec<&str> {
        self.namespace.message_ids()
    }

    pub fn enum_ids(&self) -> Vec<&str> {
        self.namespace.enum_ids()
    }

    pub fn message_count(&self) -> usize {
        self.namespace.message_count()
    }

    pub fn enum_count(&self) -> usize {
        self.namespace.enum_count()
    }

    /// Resolve `type_name` as seen from the scope `from_scope` (a
    /// fully-qualified message id, or `""` for the root).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Resolution`] if the name is not a
    /// primitive and matches no message or enum at any enclosing scope.
    pub fn resolve(
        &self,
        type_name: &str,
        from_scope: &str,
    ) -> Result<ResolvedType<'_>, ValidationError> {
        resolve(&self.namespace, &self.primitives, type_name, from_scope)
    }

    /// Validate `value` against a message.
    ///
    /// Returns `Ok(())` when the value conforms; otherwise the first
    /// violation found.
    pub fn validate<'a>(
        &self,
        message: impl Into<MessageRef<'a>>,
        value: &Value,
    ) -> Result<(), ValidationError> {
        let message = match message.into() {
            MessageRef::Type(message) => message,
            MessageRef::Name(name) => match self.resolve(name, "")? {
                ResolvedType::Message(message) => message,
                ResolvedType::Primitive(_) | ResolvedType::Enum(_) => {
                    return Err(ValidationError::NotAMessage {
                        type_name: name.to_string(),
                    });
                }
            },
        };

        if !matches!(value, Value::Record(_)) {
            return Err(ValidationError::NotObject {
                path: message.id.clone(),
                message_id: message.id.clone(),
            });
        }

        let result = self.validate_message(message, value);
        if let Err(e) = &result {
            tracing::trace!(message = %message.id, error = %e, "validation failed");
        }
        result
    }

    fn validate_message(&self, message: &MessageType, value: &Value) -> Result<(), ValidationError> {
        let mut oneofs: HashSet<&str> = HashSet::new();

        for field in &message.fields {
            let path = format!("{}.{}", message.id, field.name);

            match value.get(&field.name).filter(|v| v.is_present()) {
                Some(field_value) => {
                    if let Some(group) = field.oneof.as_deref() {
                        if !oneofs.insert(group) {
                            return Err(ValidationError::OneofConflict {
                                group: group.to_string(),
                                path,
                            });
                        }
                    }
                    self.validate_field(message, field, &path, field_value)?;
                }
                None if field.required => {
                    return Err(ValidationError::RequiredField { path });
                }
                None => {}
            }
        }

        Ok(())
    }

    fn validate_field(
        &self,
        message: &MessageType,
        field: &FieldPlan,
        path: &str,
        value: &Value,
    ) -> Result<(), ValidationError> {
        match &field.kind {
            FieldKind::Map { key, value: value_type } => {
                let key_type = self.resolve(key, &message.id)?;
                let value_type = self.resolve(value_type, &message.id)?;
                let key_path = format!("{path}.key");
                let value_path = format!("{path}.value");

                match value {
                    Value::Map(entries) => {
                        for (k, v) in entries {
                            self.check(&key_path, key_type, k, &Constraints::NONE)?;
                            self.check(&value_path, value_type, v, &field.constraints)?;
                        }
                    }
                    Value::Record(record) => {
                        if key != TEXT_TYPE {
                            return Err(ValidationError::MapKeyType {
                                path: path.to_string(),
                                key_type: key.clone(),
                            });
                        }
                        for (k, v) in record {
                            let k = Value::String(k.clone());
                            self.check(&key_path, key_type, &k, &Constraints::NONE)?;
                            self.check(&value_path, value_type, v, &field.constraints)?;
                        }
                    }
                    _ => {
                        return Err(ValidationError::MapShape {
                            path: path.to_string(),
                        });
                    }
                }
                Ok(())
            }
            FieldKind::Repeated { type_name } => {
                let item_type = self.resolve(type_name, &message.id)?;
                let Value::List(items) = value else {
                    return Err(ValidationError::NotArray {
                        path: path.to_string(),
                    });
                };

                field.constraints.check(value, path)?;

                for (i, item) in items.iter().enumerate() {
                    self.check(&format!("{path}[{i}]"), item_type, item, &field.item_constraints)?;
                }
                Ok(())
            }
            FieldKind::Scalar { type_name } => {
                let ty = self.resolve(type_name, &message.id)?;
                self.check(path, ty, value, &field.constraints)
            }
        }
    }

    /// Check one value (a scalar field, a list element, or a map key/value).
    fn check(
        &self,
        path: &str,
        ty: ResolvedType<'_>,
        value: &Value,
        constraints: &Constraints,
    ) -> Result<(), ValidationError> {
        match ty {
            ResolvedType::Primitive(type_name) => {
                if !self.primitives.check(type_name, value) {
                    return Err(ValidationError::PrimitiveType {
                        path: path.to_string(),
                        type_name: type_name.to_string(),
                    });
                }
                constraints.check(value, path)
            }
            ResolvedType::Enum(enum_type) => match value {
                Value::String(literal) if enum_type.contains(literal) => Ok(()),
                _ => Err(ValidationError::EnumValue {
                    path: path.to_string(),
                    literals: enum_type.literal_names(),
                }),
            },
            ResolvedType::Message(message) => match value {
                Value::Record(_) => self.validate_message(message, value),
                _ => Err(ValidationError::NotObject {
                    path: path.to_string(),
                    message_id: message.id.clone(),
                }),
            },
        }
    }
}
