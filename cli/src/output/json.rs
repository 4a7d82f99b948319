//! JSON output helpers.
//!
//! Catalog listings are emitted as an array of the provider's own rows.
//! Failures use a fixed error object:
//!
//! ```json
//! { "error": true, "message": "...", "code": "..." }
//! ```

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::application::ports::{Catalog, CatalogRow};
use crate::domain::{ConfigError, Operation, WorkflowError};

/// Format a JSON error object.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a catalog listing as `{"catalog": name, "items": [...]}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_catalog(catalog: Catalog, rows: &[CatalogRow]) -> Result<String> {
    let obj = json!({
        "catalog": catalog.name(),
        "items": rows.iter().cloned().map(Value::Object).collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the operation table as an array of `{name, kind, signature}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_signatures(ops: &[Operation]) -> Result<String> {
    let items: Vec<Value> = ops
        .iter()
        .map(|op| {
            json!({
                "name": op.name(),
                "signature": op.signature(),
                "requires_instance": op.requires_instance(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&items).context("JSON serialization failed")
}

/// Renders output as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_catalog(&self, catalog: Catalog, rows: &[CatalogRow]) -> Result<()> {
        println!("{}", format_catalog(catalog, rows)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_signatures(&self, ops: &[Operation]) -> Result<()> {
        println!("{}", format_signatures(ops)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        let out = serde_json::to_string_pretty(&json!({ "version": version }))
            .context("JSON serialization failed")?;
        println!("{out}");
        Ok(())
    }
}

/// Machine code for an error: the `WorkflowError` code when there is one.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<WorkflowError>() {
        return e.code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "invalid_config";
    }
    "error"
}
