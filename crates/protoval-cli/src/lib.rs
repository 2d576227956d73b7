//! # protoval-cli — Command-Line Validation
//!
//! Provides the `protoval` command-line interface.
//!
//! ## Subcommands
//!
//! - `protoval validate` — validate documents against a message type.
//! - `protoval types` — list the types a schema defines.
//!
//! ```bash
//! protoval validate --schema schemas/test.schema.json --message Basic doc.json
//! protoval types --schema schemas/shop/order.schema.yaml
//! ```
//!
//! ## Exit Codes
//!
//! `0` when every document conforms, `1` when at least one does not, `2`
//! on operational errors (unreadable schema or document).

pub mod types;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use protoval_core::Value;

/// Load a document as a [`Value`], choosing the format from the file
/// extension: `.yaml`/`.yml` for YAML, anything else for JSON.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read document {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let value = match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            Value::from(yaml)
        }
        _ => {
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;
            Value::from(json)
        }
    };
    Ok(value)
}
