//! # Field Option Constraints
//!
//! Parses the recognized length and range options out of a field's option
//! record and checks values against them. All thresholds are inclusive.
//!
//! Repeated fields also accept `item`-prefixed variants (`itemLength`,
//! `itemMinLength`, `itemMax`, ...) that apply to each element. The prefix
//! is stripped and the following letter lowered to get the element option
//! name. Keys that do not match `item` followed by an uppercase letter are
//! not item options.

use std::collections::BTreeMap;

use protoval_core::{Constraint, OptionValue, Value, ValidationError};

/// A numeric threshold with its schema spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub display: String,
}

/// The constraint set of one field (or of its elements).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub length: Option<Bound>,
    pub min_length: Option<Bound>,
    pub max_length: Option<Bound>,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl Constraints {
    pub const NONE: Self = Self {
        length: None,
        min_length: None,
        max_length: None,
        min: None,
        max: None,
    };

    /// Read the recognized constraint keys from an option record.
    /// Unknown keys are ignored, as are values that are not numeric.
    pub fn from_options(options: &BTreeMap<String, OptionValue>) -> Self {
        let bound = |constraint: Constraint| {
            let raw = options.get(constraint.option_key())?;
            match raw.as_number() {
                Some(value) => Some(Bound {
                    value,
                    display: raw.to_string(),
                }),
                None => {
                    tracing::warn!(
                        option = constraint.option_key(),
                        value = %raw,
                        "ignoring non-numeric field option"
                    );
                    None
                }
            }
        };

        Self {
            length: bound(Constraint::Length),
            min_length: bound(Constraint::MinLength),
            max_length: bound(Constraint::MaxLength),
            min: bound(Constraint::Min),
            max: bound(Constraint::Max),
        }
    }

    /// The element constraints declared by `item`-prefixed option keys.
    pub fn items_from_options(options: &BTreeMap<String, OptionValue>) -> Self {
        let derived: BTreeMap<String, OptionValue> = options
            .iter()
            .filter_map(|(key, value)| item_option_name(key).map(|name| (name, value.clone())))
            .collect();
        Self::from_options(&derived)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::NONE
    }

    /// Check `value` against every present constraint, in the order
    /// length, minLength, maxLength, min, max.
    ///
    /// Length constraints apply to sized values (strings, bytes, lists) and
    /// range constraints to numbers; a constraint that does not apply to the
    /// value's shape is skipped.
    #[allow(clippy::cast_precision_loss)]
    pub fn check(&self, value: &Value, path: &str) -> Result<(), ValidationError> {
        if let Some(len) = value.len() {
            let len = len as f64;
            ensure(self.length.as_ref(), Constraint::Length, path, |b| len == b)?;
            ensure(self.min_length.as_ref(), Constraint::MinLength, path, |b| len >= b)?;
            ensure(self.max_length.as_ref(), Constraint::MaxLength, path, |b| len <= b)?;
        }

        if let Value::Number(n) = value {
            ensure(self.min.as_ref(), Constraint::Min, path, |b| *n >= b)?;
            ensure(self.max.as_ref(), Constraint::Max, path, |b| *n <= b)?;
        }

        Ok(())
    }
}

fn ensure(
    bound: Option<&Bound>,
    constraint: Constraint,
    path: &str,
    holds: impl FnOnce(f64) -> bool,
) -> Result<(), ValidationError> {
    match bound {
        Some(b) if !holds(b.value) => Err(ValidationError::OptionConstraint {
            path: path.to_string(),
            constraint,
            threshold: b.display.clone(),
        }),
        _ => Ok(()),
    }
}

/// `itemMinLength` -> `minLength`. Anything else -> `None`.
fn item_option_name(key: &str) -> Option<String> {
    let rest = key.strip_prefix("item")?;
    let mut chars = rest.chars();
    let first = chars.next().filter(char::is_ascii_uppercase)?;
    Some(first.to_ascii_lowercase().to_string() + chars.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(json: serde_json::Value) -> BTreeMap<String, OptionValue> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn item_option_names() {
        assert_eq!(item_option_name("itemLength").as_deref(), Some("length"));
        assert_eq!(item_option_name("itemMinLength").as_deref(), Some("minLength"));
        assert_eq!(item_option_name("itemMax").as_deref(), Some("max"));
        assert_eq!(item_option_name("item"), None);
        assert_eq!(item_option_name("itemlength"), None);
        assert_eq!(item_option_name("length"), None);
        assert_eq!(item_option_name("items"), None);
    }

    #[test]
    fn parses_own_and_item_constraints() {
        let opts = options(json!({"length": 2, "itemLength": "3", "packed": true}));
        let own = Constraints::from_options(&opts);
        let items = Constraints::items_from_options(&opts);

        assert_eq!(own.length.as_ref().map(|b| b.value), Some(2.0));
        assert!(own.min.is_none());
        assert_eq!(items.length.as_ref().map(|b| b.display.as_str()), Some("3"));
        assert!(items.max.is_none());
    }

    #[test]
    fn non_numeric_option_is_ignored() {
        let opts = options(json!({"min": "abc"}));
        assert!(Constraints::from_options(&opts).is_empty());
    }

    #[test]
    fn length_exact() {
        let c = Constraints::from_options(&options(json!({"length": 5})));
        assert!(c.check(&Value::from("12345"), "M.f").is_ok());
        let err = c.check(&Value::from("hi"), "M.f").unwrap_err();
        assert_eq!(err.to_string(), "M.f must have length = 5.");
    }

    #[test]
    fn length_bounds_inclusive() {
        let c = Constraints::from_options(&options(json!({"minLength": 2, "maxLength": 5})));
        assert!(c.check(&Value::from("12"), "M.f").is_ok());
        assert!(c.check(&Value::from("12345"), "M.f").is_ok());
        assert_eq!(
            c.check(&Value::from("1"), "M.f").unwrap_err().to_string(),
            "M.f must have length >= 2."
        );
        assert_eq!(
            c.check(&Value::from("123456"), "M.f").unwrap_err().to_string(),
            "M.f must have length <= 5."
        );
    }

    #[test]
    fn range_bounds_inclusive() {
        let c = Constraints::from_options(&options(json!({"min": 2, "max": 5})));
        assert!(c.check(&Value::from(2), "M.f").is_ok());
        assert!(c.check(&Value::from(5), "M.f").is_ok());
        assert_eq!(
            c.check(&Value::from(1), "M.f").unwrap_err().to_string(),
            "M.f must be >= 2."
        );
        assert_eq!(
            c.check(&Value::from(6), "M.f").unwrap_err().to_string(),
            "M.f must be <= 5."
        );
    }

    #[test]
    fn zero_threshold_is_enforced() {
        let c = Constraints::from_options(&options(json!({"min": 0})));
        assert!(c.check(&Value::from(0), "M.f").is_ok());
        assert!(c.check(&Value::from(-1), "M.f").is_err());
    }

    #[test]
    fn inapplicable_constraints_skipped() {
        let c = Constraints::from_options(&options(json!({"length": 2, "min": 3})));
        // No length on numbers, no range on strings.
        assert!(c.check(&Value::from(10), "M.f").is_ok());
        assert!(c.check(&Value::from("ab"), "M.f").is_ok());
        assert!(c.check(&Value::Bool(true), "M.f").is_ok());
    }

    #[test]
    fn list_length() {
        let c = Constraints::from_options(&options(json!({"minLength": 2})));
        assert!(c.check(&Value::from(vec![1, 2]), "M.f").is_ok());
        assert!(c.check(&Value::from(vec![1]), "M.f").is_err());
    }
}
