use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ProviderId;

/// What a provider job was issued for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    Create,
    Boot,
    Reboot,
    Shutdown,
    Resize,
    DeleteDisk,
    DeleteInstance,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Boot => "boot",
            Self::Reboot => "reboot",
            Self::Shutdown => "shutdown",
            Self::Resize => "resize",
            Self::DeleteDisk => "delete-disk",
            Self::DeleteInstance => "delete-instance",
        };
        f.write_str(s)
    }
}

/// Handle on a pending provider job. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub linode_id: ProviderId,
    pub job_id: u64,
    pub kind: JobKind,
}

impl JobHandle {
    #[must_use]
    pub fn new(linode_id: ProviderId, job_id: u64, kind: JobKind) -> Self {
        Self {
            linode_id,
            job_id,
            kind,
        }
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} job {} on linode {}",
            self.kind, self.job_id, self.linode_id
        )
    }
}

/// Observed state of a provider job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed { detail: String },
}

/// Instance status as reported by the provider, independent of any job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    BeingCreated,
    BrandNew,
    Running,
    PoweredOff,
    Other(i64),
}

impl InstanceStatus {
    /// Map the provider's numeric status field.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => Self::BeingCreated,
            0 => Self::BrandNew,
            1 => Self::Running,
            2 => Self::PoweredOff,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn is_ready(self) -> bool {
        self == Self::Running
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeingCreated => f.write_str("being created"),
            Self::BrandNew => f.write_str("brand new"),
            Self::Running => f.write_str("running"),
            Self::PoweredOff => f.write_str("powered off"),
            Self::Other(code) => write!(f, "status {code}"),
        }
    }
}
