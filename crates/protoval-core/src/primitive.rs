//! # Primitive Wire-Type Predicates
//!
//! A pluggable table from wire-type name to a predicate over [`Value`].
//! A type name found in the table is primitive: it is never scope-qualified
//! during resolution and is checked by its predicate rather than structurally.
//!
//! The standard table covers the protocol-buffer scalar types. 64-bit
//! integers are limited to the safe-integer range of an IEEE-754 double,
//! since numbers are carried as `f64`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Largest integer exactly representable in an `f64` (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The primitive type representing text. Only maps keyed by this type may
/// be given as a plain record.
pub const TEXT_TYPE: &str = "string";

/// A primitive predicate. Shared so tables can be cloned cheaply and used
/// from several threads.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapping from primitive type name to its predicate.
#[derive(Clone, Default)]
pub struct PrimitiveTable {
    predicates: HashMap<String, Predicate>,
}

impl PrimitiveTable {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard protocol-buffer scalar types.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table
            .register("bytes", |v| matches!(v, Value::Bytes(_)))
            .register(TEXT_TYPE, |v| matches!(v, Value::String(_)))
            .register("bool", |v| matches!(v, Value::Bool(_)))
            .register("int32", integer_in(-2_147_483_648.0, 2_147_483_647.0))
            .register("sint32", integer_in(-2_147_483_648.0, 2_147_483_647.0))
            .register("uint32", integer_in(0.0, 4_294_967_295.0))
            .register("int64", integer_in(-MAX_SAFE_INTEGER, MAX_SAFE_INTEGER))
            .register("sint64", integer_in(-MAX_SAFE_INTEGER, MAX_SAFE_INTEGER))
            .register("uint64", integer_in(0.0, MAX_SAFE_INTEGER));
        for name in ["fixed32", "fixed64", "sfixed32", "sfixed64", "float", "double"] {
            table.register(name, |v| matches!(v, Value::Number(_)));
        }
        table
    }

    /// Add or replace the predicate for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// The table's own copy of `name`, if registered.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.predicates.get_key_value(name).map(|(k, _)| k.as_str())
    }

    /// Run the predicate for `name`. Unregistered names accept nothing.
    pub fn check(&self, name: &str, value: &Value) -> bool {
        self.predicates.get(name).is_some_and(|p| p(value))
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for PrimitiveTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveTable")
            .field("types", &self.names())
            .finish()
    }
}

fn integer_in(min: f64, max: f64) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |v| match v {
        Value::Number(n) => n.is_finite() && n.fract() == 0.0 && *n >= min && *n <= max,
        _ => false,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range integer passes int32; stepping outside fails.
        #[test]
        fn int32_accepts_whole_range(n in i32::MIN..=i32::MAX) {
            let table = PrimitiveTable::standard();
            prop_assert!(table.check("int32", &Value::from(n)));
            prop_assert!(table.check("sint32", &Value::from(n)));
        }

        #[test]
        fn int32_rejects_beyond_range(n in (i64::from(i32::MAX) + 1)..i64::from(u32::MAX) * 4) {
            let table = PrimitiveTable::standard();
            prop_assert!(!table.check("int32", &Value::from(n)));
            prop_assert!(!table.check("int32", &Value::from(-n)));
        }

        /// Non-integral numbers never satisfy an integer type.
        #[test]
        fn fractions_rejected(whole in -1000i32..1000, frac in 0.01f64..0.99) {
            let table = PrimitiveTable::standard();
            let v = Value::Number(f64::from(whole) + frac);
            prop_assert!(!table.check("int32", &v));
            prop_assert!(!table.check("int64", &v));
            prop_assert!(table.check("double", &v));
        }
    }
}
