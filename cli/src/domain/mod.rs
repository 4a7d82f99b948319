//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod operation;
pub mod registry;

pub use config::{LinodectlConfig, PollBudget, PollSettings, validate_config};
pub use error::{ConfigError, WorkflowError};
pub use operation::{Operation, OperationKind};
pub use registry::{Located, locate, validate_create, validate_instance_name};
