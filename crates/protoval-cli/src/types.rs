//! # Types Subcommand
//!
//! Lists the fully-qualified message and enum ids of a schema, one per line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use protoval_schema::ProtoValidator;

/// Arguments for the `protoval types` subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Schema tree file (JSON or YAML).
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Also list each message's fields.
    #[arg(long)]
    pub fields: bool,
}

/// Execute the types subcommand.
pub fn run_types(args: &TypesArgs) -> Result<u8> {
    let validator = ProtoValidator::from_path(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;

    for line in describe(&validator, args.fields) {
        println!("{line}");
    }
    Ok(0)
}

/// One line per type, messages first, each group sorted by id.
pub fn describe(validator: &ProtoValidator, with_fields: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for id in validator.message_ids() {
        lines.push(format!("message {id}"));
        if !with_fields {
            continue;
        }
        if let Some(message) = validator.message(id) {
            for field in &message.fields {
                let required = if field.required { " (required)" } else { "" };
                lines.push(format!("  {}: {}{required}", field.name, kind_label(&field.kind)));
            }
        }
    }

    for id in validator.enum_ids() {
        lines.push(format!("enum {id}"));
    }

    lines
}

fn kind_label(kind: &protoval_schema::FieldKind) -> String {
    use protoval_schema::FieldKind;

    match kind {
        FieldKind::Scalar { type_name } => type_name.clone(),
        FieldKind::Repeated { type_name } => format!("repeated {type_name}"),
        FieldKind::Map { key, value } => format!("map<{key}, {value}>"),
    }
}
