//! # protoval-core — Foundational Types for protoval
//!
//! This crate defines the data shared by every other protoval crate. It
//! depends on nothing internal.
//!
//! ## Contents
//!
//! 1. **Schema tree** ([`tree`]). The already-parsed shape of a `.proto`
//!    file: messages, nested messages, enums, and fields with their
//!    modifiers and options. Produced by an external parser and deserialized
//!    with serde.
//!
//! 2. **Runtime values** ([`value`]). `Value` is the candidate being
//!    validated. It distinguishes a plain string-keyed `Record` from an
//!    ordered key/value `Map`, and carries binary `Bytes` explicitly.
//!
//! 3. **Primitive predicates** ([`primitive`]). A pluggable table mapping a
//!    wire-type name (`int32`, `string`, ...) to a predicate over `Value`.
//!
//! 4. **Errors** ([`error`]). One `ValidationError` variant per violation
//!    kind. The `Display` output is the stable, path-qualified message.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `protoval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod primitive;
pub mod tree;
pub mod value;

pub use error::{Constraint, ErrorKind, ValidationError};
pub use primitive::{Predicate, PrimitiveTable, MAX_SAFE_INTEGER, TEXT_TYPE};
pub use tree::{EnumDef, EnumLiteral, EnumValues, FieldDef, MapDef, MessageDef, OptionValue, SchemaTree};
pub use value::Value;
