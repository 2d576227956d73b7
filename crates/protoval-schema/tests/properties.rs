//! Property tests for presence, oneof exclusivity, and item constraints.

use proptest::prelude::*;
use protoval_core::{ErrorKind, SchemaTree, Value};
use protoval_schema::ProtoValidator;
use serde_json::json;

fn validator() -> ProtoValidator {
    let tree: SchemaTree = serde_json::from_value(json!({
        "messages": [
            {"name": "Req", "fields": [
                {"name": "field", "type": "Any", "required": true}
            ]},
            {"name": "Pick", "fields": [
                {"name": "a", "type": "string", "oneof": "g"},
                {"name": "b", "type": "string", "oneof": "g"}
            ]},
            {"name": "Codes", "fields": [
                {"name": "codes", "type": "string", "repeated": true, "options": {"itemLength": 2}}
            ]}
        ]
    }))
    .unwrap();
    let mut prims = protoval_core::PrimitiveTable::standard();
    prims.register("Any", |_| true);
    ProtoValidator::with_primitives(&tree, prims)
}

fn present_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(Value::from),
        Just(Value::record(Vec::<(String, Value)>::new())),
    ]
}

proptest! {
    /// Any present value satisfies a required field; absence never does.
    #[test]
    fn required_accepts_any_present_value(value in present_value()) {
        let v = validator();
        prop_assert!(v.validate("Req", &Value::record([("field", value)])).is_ok());
    }

    #[test]
    fn oneof_allows_exactly_one(a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
        let v = validator();
        prop_assert!(v.validate("Pick", &Value::record([("a", a.clone())])).is_ok());
        prop_assert!(v.validate("Pick", &Value::record([("b", b.clone())])).is_ok());
        let both = Value::record([("a", a), ("b", b)]);
        prop_assert_eq!(
            v.validate("Pick", &both).unwrap_err().kind(),
            ErrorKind::OneofConflict
        );
    }

    /// The first element with the wrong length is the one reported.
    #[test]
    fn item_length_reports_first_bad_index(
        good in prop::collection::vec("[a-z]{2}", 0..5),
        bad in "[a-z]{3,6}",
    ) {
        let v = validator();
        let index = good.len();
        let mut codes = good;
        codes.push(bad);
        codes.push("zz".to_string());
        let err = v
            .validate("Codes", &Value::record([("codes", Value::from(codes))]))
            .unwrap_err();
        prop_assert_eq!(err.to_string(), format!("Codes.codes[{index}] must have length = 2."));
    }
}

#[test]
fn required_rejects_absence_markers() {
    let v = validator();
    for absent in [Value::Null, Value::Number(f64::NAN)] {
        let err = v
            .validate("Req", &Value::record([("field", absent)]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Req.field is required.");
    }
    let err = v
        .validate("Req", &Value::record(Vec::<(String, Value)>::new()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequiredField);
}
