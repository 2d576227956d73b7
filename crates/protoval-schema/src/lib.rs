//! # protoval-schema — Protocol-Buffer Message Validation
//!
//! Checks runtime values against the message types of a parsed
//! protocol-buffer schema and reports the first violation with a
//! fully-qualified path.
//!
//! ## Components
//!
//! - [`namespace`] — indexes a [`SchemaTree`](protoval_core::SchemaTree)
//!   into flat id -> message and id -> enum maps, classifying every field.
//! - [`resolve`] — protocol-buffer scoped lookup of type names.
//! - [`validate`] — the recursive engine, [`ProtoValidator`].
//! - [`options`] — length and range constraints from field options.
//! - [`load`] — reading schema trees from JSON/YAML files, with imports.
//!
//! ## Usage
//!
//! ```no_run
//! use protoval_core::Value;
//! use protoval_schema::ProtoValidator;
//!
//! let validator = ProtoValidator::from_path("schemas/test.schema.json")?;
//! let doc = Value::from(serde_json::json!({"foo": "hi", "bar": 2}));
//! validator.validate("Basic", &doc)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `protoval-core` internally.
//! - The index is immutable after construction; validation never mutates
//!   shared state.

pub mod load;
pub mod namespace;
pub mod options;
pub mod resolve;
pub mod validate;

use std::path::Path;

use protoval_core::{ValidationError, Value};

pub use load::{SchemaLoadError, SchemaLoader, SchemaSource};
pub use namespace::{EnumType, FieldKind, FieldPlan, MessageType, Namespace};
pub use options::{Bound, Constraints};
pub use resolve::ResolvedType;
pub use validate::{MessageRef, ProtoValidator};

/// Load the schema at `path` and return a validation function bound to it.
///
/// # Errors
///
/// Returns [`SchemaLoadError`] if the schema cannot be loaded.
pub fn validator(
    path: impl AsRef<Path>,
) -> Result<impl Fn(&str, &Value) -> Result<(), ValidationError> + Send + Sync, SchemaLoadError> {
    let engine = ProtoValidator::from_path(path)?;
    Ok(move |message: &str, value: &Value| engine.validate(message, value))
}
