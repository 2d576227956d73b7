//! # Validate Subcommand
//!
//! Validates one or more documents against a message type of a schema and
//! prints a pass/fail report.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use protoval_schema::{ProtoValidator, ResolvedType};

use crate::load_document;

/// Arguments for the `protoval validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema tree file (JSON or YAML).
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Message type to validate against, e.g. `Parent.Child`.
    #[arg(long, short)]
    pub message: String,

    /// Documents to validate (JSON, or YAML by extension).
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let validator = ProtoValidator::from_path(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;

    tracing::info!(
        messages = validator.message_count(),
        enums = validator.enum_count(),
        "loaded schema"
    );

    let report = validate_documents(&validator, &args.message, &args.documents)?;

    for path in &report.passed {
        println!("  PASS: {}", path.display());
    }
    for (path, err) in &report.failures {
        println!("  FAIL: {}: {}", path.display(), err);
    }
    println!(
        "Documents: {}/{} passed",
        report.passed.len(),
        report.total()
    );

    Ok(u8::from(!report.failures.is_empty()))
}

/// Outcome of validating a batch of documents.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub passed: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.passed.len() + self.failures.len()
    }
}

/// Validate every document against `message`.
///
/// A document that fails validation is recorded in the report. A message
/// name that does not resolve to a message type, or a document that cannot
/// be read or parsed, aborts the batch with an error.
pub fn validate_documents(
    validator: &ProtoValidator,
    message: &str,
    documents: &[PathBuf],
) -> Result<ValidationReport> {
    let target = match validator
        .resolve(message, "")
        .with_context(|| format!("unknown message type {message}"))?
    {
        ResolvedType::Message(target) => target,
        ResolvedType::Primitive(_) | ResolvedType::Enum(_) => {
            bail!("{message} is not a message type")
        }
    };

    let mut report = ValidationReport::default();

    for path in documents {
        let value = load_document(path)?;
        match validator.validate(target, &value) {
            Ok(()) => report.passed.push(path.clone()),
            Err(e) => {
                tracing::debug!(document = %path.display(), error = %e, "document rejected");
                report.failures.push((path.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}
