//! Integration test: a YAML schema that imports a JSON schema.
//!
//! `schemas/shop/order.schema.yaml` references `Money` and `.Address`,
//! which live in `schemas/shop/common.schema.json`. Documents are loaded
//! from YAML and JSON the way the CLI loads them.

use std::path::PathBuf;

use protoval_core::{ErrorKind, Value};
use protoval_schema::ProtoValidator;

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop();
    dir.pop();
    dir
}

fn shop() -> ProtoValidator {
    ProtoValidator::from_path(repo_root().join("schemas/shop/order.schema.yaml"))
        .expect("failed to load shop schema")
}

fn order(yaml: &str) -> Value {
    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).expect("invalid test YAML");
    Value::from(parsed)
}

const VALID_ORDER: &str = r#"
id: ORD-0001
status: PAID
lines:
  - sku: ABC-1
    quantity: 2
    price: {currency: USD, cents: 1250}
notes: [leave at door]
attributes: {gift: "yes"}
email: buyer@example.com
address:
  lines: [1 Main St]
  country: US
"#;

#[test]
fn imports_are_merged_into_namespace() {
    let v = shop();
    assert_eq!(v.package(), Some("shop"));
    assert!(v.message("Money").is_some());
    assert!(v.message("Address").is_some());
    assert!(v.message("Order.Line").is_some());
    assert!(v.enum_type("Order.Status").is_some());
}

#[test]
fn valid_order_passes() {
    shop().validate("Order", &order(VALID_ORDER)).unwrap();
}

#[test]
fn nested_import_type_is_checked() {
    let doc = VALID_ORDER.replace("currency: USD", "currency: US");
    let err = shop().validate("Order", &order(&doc)).unwrap_err();
    assert_eq!(err.to_string(), "Money.currency must have length = 3.");
}

#[test]
fn enum_literal_is_required() {
    let doc = VALID_ORDER.replace("status: PAID", "status: REFUNDED");
    let err = shop().validate("Order", &order(&doc)).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Order.status must be one of ("PENDING", "PAID", "SHIPPED")."#
    );
}

#[test]
fn empty_line_list_violates_min_length() {
    let doc = VALID_ORDER.replace(
        "lines:\n  - sku: ABC-1\n    quantity: 2\n    price: {currency: USD, cents: 1250}\n",
        "lines: []\n",
    );
    let err = shop().validate("Order", &order(&doc)).unwrap_err();
    assert_eq!(err.to_string(), "Order.lines must have length >= 1.");
}

#[test]
fn quantity_range() {
    let doc = VALID_ORDER.replace("quantity: 2", "quantity: 0");
    let err = shop().validate("Order", &order(&doc)).unwrap_err();
    assert_eq!(err.to_string(), "Order.Line.quantity must be >= 1.");

    let doc = VALID_ORDER.replace("quantity: 2", "quantity: 100");
    shop().validate("Order", &order(&doc)).unwrap();
}

#[test]
fn contact_oneof() {
    let doc = format!("{VALID_ORDER}phone: \"555-0100\"\n");
    let err = shop().validate("Order", &order(&doc)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OneofConflict);
}

#[test]
fn absolute_type_reference() {
    let doc = VALID_ORDER.replace("country: US", "country: USA");
    let err = shop().validate("Order", &order(&doc)).unwrap_err();
    assert_eq!(err.to_string(), "Address.country must have length = 2.");
}

#[test]
fn json_document() {
    let doc = serde_json::json!({
        "id": "ORD-0002",
        "status": "PENDING",
        "lines": [{"sku": "XYZ", "quantity": 1, "price": {"currency": "EUR", "cents": 5}}],
        "notes": ["a", "b", "c", "d"]
    });
    let err = shop().validate("Order", &Value::from(doc)).unwrap_err();
    assert_eq!(err.to_string(), "Order.notes must have length <= 3.");
}
