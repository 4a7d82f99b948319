//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator; callers recover the variant with `downcast_ref`.

use thiserror::Error;

// ── Workflow errors ───────────────────────────────────────────────────────────

/// Errors raised by the provisioning workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("No \"{cluster}\" cluster found. Known clusters are: {known}.")]
    UnknownCluster { cluster: String, known: String },

    #[error("Instance \"{name}\" already exists in cluster \"{cluster}\".")]
    DuplicateInstance { name: String, cluster: String },

    #[error("No instance found matching \"{0}\". Add it to a cluster first.")]
    UnknownInstance(String),

    #[error("No linode labelled \"{0}\" found in your account.")]
    InstanceNotFound(String),

    #[error("Linode API error: {0}")]
    ApiError(String),

    #[error("{job} failed: {detail}")]
    JobFailed { job: String, detail: String },

    #[error("Timed out after {attempts} attempts waiting for {waiting_for}.")]
    Timeout { waiting_for: String, attempts: u32 },

    #[error("Missing Linode API key. Set LINODE_API_KEY or api_key in {0}.")]
    MissingCredential(String),
}

impl WorkflowError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing_parameter",
            Self::UnknownCluster { .. } => "unknown_cluster",
            Self::DuplicateInstance { .. } => "duplicate_instance",
            Self::UnknownInstance(_) => "unknown_instance",
            Self::InstanceNotFound(_) => "instance_not_found",
            Self::ApiError(_) => "api_error",
            Self::JobFailed { .. } => "job_failed",
            Self::Timeout { .. } => "timeout",
            Self::MissingCredential(_) => "missing_credential",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
