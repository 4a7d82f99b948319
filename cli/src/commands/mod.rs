//! Command implementations

pub mod boot;
pub mod catalog;
pub mod create;
pub mod destroy;
pub mod reboot;
pub mod resize;
pub mod shutdown;
pub mod signatures;
pub mod version;

use anyhow::Result;
use clap::Args;

use crate::domain::WorkflowError;

/// Arguments shared by commands that act on one registry instance.
#[derive(Args, Debug, Default)]
pub struct InstanceArgs {
    /// Instance name, optionally qualified as `cluster/name`
    pub name: Option<String>,
}

impl InstanceArgs {
    /// The instance name, or `MissingParameter` when it was omitted.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::MissingParameter` when no name was given.
    pub fn require_name(&self) -> Result<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| WorkflowError::MissingParameter("[name]".into()).into())
    }
}
