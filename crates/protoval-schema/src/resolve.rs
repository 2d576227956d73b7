//! # Type Resolution
//!
//! Turns a type name spelled in a field into a concrete type, using
//! protocol-buffer lexical scoping.
//!
//! A name found in the primitive table is returned unchanged; primitives are
//! never scope-qualified. Otherwise the lookup starts in the innermost
//! scope and walks outwards: a type `T` referenced from `Parent.Child` is
//! tried as `Parent.Child.T`, then `Parent.T`, then `T`. Messages are
//! preferred over enums at each level. A name with a leading dot is
//! already fully qualified and is looked up only at the root.

use protoval_core::{PrimitiveTable, ValidationError};

use crate::namespace::{EnumType, MessageType, Namespace};

/// The outcome of resolving a type name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedType<'a> {
    Primitive(&'a str),
    Message(&'a MessageType),
    Enum(&'a EnumType),
}

impl ResolvedType<'_> {
    /// The primitive name or fully-qualified id.
    pub fn id(&self) -> &str {
        match self {
            Self::Primitive(name) => name,
            Self::Message(m) => &m.id,
            Self::Enum(e) => &e.id,
        }
    }
}

pub(crate) fn resolve<'a>(
    namespace: &'a Namespace,
    primitives: &'a PrimitiveTable,
    type_name: &str,
    scope: &str,
) -> Result<ResolvedType<'a>, ValidationError> {
    if let Some(name) = primitives.canonical_name(type_name) {
        return Ok(ResolvedType::Primitive(name));
    }

    let lookup = |id: &str| {
        namespace
            .message(id)
            .map(ResolvedType::Message)
            .or_else(|| namespace.enum_type(id).map(ResolvedType::Enum))
    };

    if let Some(absolute) = type_name.strip_prefix('.') {
        return lookup(absolute).ok_or_else(|| unresolved(type_name, scope));
    }

    let segments: Vec<&str> = if scope.is_empty() {
        Vec::new()
    } else {
        scope.split('.').collect()
    };

    for depth in (0..=segments.len()).rev() {
        let candidate = if depth == 0 {
            type_name.to_string()
        } else {
            format!("{}.{type_name}", segments[..depth].join("."))
        };
        if let Some(found) = lookup(&candidate) {
            return Ok(found);
        }
    }

    Err(unresolved(type_name, scope))
}

fn unresolved(type_name: &str, scope: &str) -> ValidationError {
    ValidationError::Resolution {
        type_name: type_name.to_string(),
        scope: scope.to_string(),
    }
}
