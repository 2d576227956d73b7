//! # Error Types — Validation Failures
//!
//! Every violation the validation engine can detect has its own variant.
//! Variants carry structured context (the fully-qualified path, the type
//! name, the violated constraint) so callers can branch on them, while the
//! `Display` implementation renders the stable message format:
//!
//! ```text
//! <fullyQualifiedPath> <reason>.
//! ```
//!
//! Array element paths append `[<index>]`, map entry paths append `.key`
//! or `.value`. A failure inside a nested message already carries the path
//! relative to the outermost call and is propagated unchanged.

use std::fmt;

use thiserror::Error;

/// A single validation failure. Validation is fail-fast: the first
/// violation in field declaration order is the one reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A type name did not resolve at any enclosing scope.
    #[error("Could not resolve {type_name}")]
    Resolution {
        /// The unresolved type name as written in the schema.
        type_name: String,
        /// Fully-qualified id of the scope the lookup started from.
        scope: String,
    },

    /// A name passed to `validate` resolved to something other than a message.
    #[error("{type_name} is not a message type")]
    NotAMessage {
        /// The name that was passed in.
        type_name: String,
    },

    /// A required field was absent, null, or NaN.
    #[error("{path} is required.")]
    RequiredField {
        /// Fully-qualified field path.
        path: String,
    },

    /// The primitive predicate for the declared wire type rejected the value.
    #[error("{path} must be a valid {type_name} value.")]
    PrimitiveType {
        /// Fully-qualified field path.
        path: String,
        /// Primitive type name, e.g. `int32`.
        type_name: String,
    },

    /// The value is not one of the enum's declared literals.
    #[error("{path} must be one of ({}).", quote_literals(.literals))]
    EnumValue {
        /// Fully-qualified field path.
        path: String,
        /// Declared literals, in declaration order.
        literals: Vec<String>,
    },

    /// A repeated field held something other than a list.
    #[error("{path} must be an array.")]
    NotArray {
        /// Fully-qualified field path.
        path: String,
    },

    /// A message-typed slot held a primitive value.
    #[error("{path} must be a valid {message_id} message.")]
    NotObject {
        /// Fully-qualified field path.
        path: String,
        /// Fully-qualified id of the expected message.
        message_id: String,
    },

    /// A map field held neither an ordered map nor a plain record.
    #[error("{path} must be a Map or plain JavaScript object.")]
    MapShape {
        /// Fully-qualified field path.
        path: String,
    },

    /// A plain record was supplied for a map whose key type is not text.
    #[error("{path} can only be a plain JavaScript object for string keys. Use a Map object instead.")]
    MapKeyType {
        /// Fully-qualified field path.
        path: String,
        /// The declared key type of the map.
        key_type: String,
    },

    /// Two fields of the same oneof group were set on one message value.
    #[error("Only one of the properties defined in oneof {group} can be set.")]
    OneofConflict {
        /// The oneof group name.
        group: String,
        /// Path of the second field found in the group.
        path: String,
    },

    /// A length or range option was violated.
    #[error("{path} must {constraint} {threshold}.")]
    OptionConstraint {
        /// Fully-qualified field path (with index or `.value` suffix).
        path: String,
        /// Which constraint was violated.
        constraint: Constraint,
        /// The threshold, rendered as written in the schema options.
        threshold: String,
    },
}

/// Fieldless discriminant of [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Resolution,
    NotAMessage,
    RequiredField,
    PrimitiveType,
    EnumValue,
    NotArray,
    NotObject,
    MapShape,
    MapKeyType,
    OneofConflict,
    OptionConstraint,
}

impl ValidationError {
    /// Returns the kind of this error without its context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::NotAMessage { .. } => ErrorKind::NotAMessage,
            Self::RequiredField { .. } => ErrorKind::RequiredField,
            Self::PrimitiveType { .. } => ErrorKind::PrimitiveType,
            Self::EnumValue { .. } => ErrorKind::EnumValue,
            Self::NotArray { .. } => ErrorKind::NotArray,
            Self::NotObject { .. } => ErrorKind::NotObject,
            Self::MapShape { .. } => ErrorKind::MapShape,
            Self::MapKeyType { .. } => ErrorKind::MapKeyType,
            Self::OneofConflict { .. } => ErrorKind::OneofConflict,
            Self::OptionConstraint { .. } => ErrorKind::OptionConstraint,
        }
    }

    /// Returns the value path the error refers to, if it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Resolution { .. } | Self::NotAMessage { .. } => None,
            Self::RequiredField { path }
            | Self::PrimitiveType { path, .. }
            | Self::EnumValue { path, .. }
            | Self::NotArray { path }
            | Self::NotObject { path, .. }
            | Self::MapShape { path }
            | Self::MapKeyType { path, .. }
            | Self::OneofConflict { path, .. }
            | Self::OptionConstraint { path, .. } => Some(path),
        }
    }
}

/// Length and range constraints recognized in field options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// `length`: exact length.
    Length,
    /// `minLength`: inclusive lower length bound.
    MinLength,
    /// `maxLength`: inclusive upper length bound.
    MaxLength,
    /// `min`: inclusive lower numeric bound.
    Min,
    /// `max`: inclusive upper numeric bound.
    Max,
}

impl Constraint {
    /// The option key that declares this constraint.
    pub fn option_key(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Length => "have length =",
            Self::MinLength => "have length >=",
            Self::MaxLength => "have length <=",
            Self::Min => "be >=",
            Self::Max => "be <=",
        })
    }
}

fn quote_literals(literals: &[String]) -> String {
    literals
        .iter()
        .map(|l| format!("\"{l}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
