//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared types crate,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use linodectl_common::{InstanceStatus, JobHandle, JobState, ProviderId, ProviderRecord, Registry};

use crate::domain::LinodectlConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Picks a provider catalog entry either by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(u64),
    Slug(String),
}

impl Selector {
    /// Build a selector from optional id/slug flags. The id wins when both
    /// are given; `None` when neither is.
    #[must_use]
    pub fn from_options(id: Option<u64>, slug: Option<&str>) -> Option<Self> {
        match (id, slug) {
            (Some(id), _) => Some(Self::Id(id)),
            (None, Some(slug)) => Some(Self::Slug(slug.to_string())),
            (None, None) => None,
        }
    }

    /// Like `from_options`, falling back to `default_slug`.
    #[must_use]
    pub fn or_default(id: Option<u64>, slug: Option<&str>, default_slug: &str) -> Self {
        Self::from_options(id, slug).unwrap_or_else(|| Self::Slug(default_slug.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Slug(slug) => write!(f, "\"{slug}\""),
        }
    }
}

/// Everything the provider needs to build a new instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSpec {
    /// Instance name, used as the provider-side label.
    pub label: String,
    pub datacenter: Selector,
    pub distribution: Selector,
    pub kernel: Selector,
    pub plan: Selector,
    pub payment_term: u32,
    pub root_password: String,
    /// Public key material installed for the root user.
    pub ssh_public_key: Option<String>,
}

/// Result of a create call: the new provider record and every job it spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub record: ProviderRecord,
    pub ip: Option<String>,
    pub jobs: Vec<JobHandle>,
}

/// Read-only provider catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Datacenters,
    Distributions,
    Kernels,
    Linodes,
    Plans,
}

impl Catalog {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Datacenters => "datacenters",
            Self::Distributions => "distributions",
            Self::Kernels => "kernels",
            Self::Linodes => "linodes",
            Self::Plans => "plans",
        }
    }
}

/// One catalog entry, with the provider's own field names.
pub type CatalogRow = serde_json::Map<String, serde_json::Value>;

// ── Provider Port Traits ──────────────────────────────────────────────────────

/// Mutating provider operations. Each call either completes synchronously or
/// hands back job handles; none of them retry.
#[allow(async_fn_in_trait)]
pub trait ProviderGateway {
    /// Find a linode by its label.
    async fn find_by_label(&self, label: &str) -> Result<Option<ProviderRecord>>;
    /// Build a new linode (instance, disks, config, boot).
    async fn create(&self, spec: &CreateSpec) -> Result<Provisioned>;
    async fn boot(&self, id: ProviderId) -> Result<JobHandle>;
    async fn reboot(&self, id: ProviderId) -> Result<JobHandle>;
    async fn shutdown(&self, id: ProviderId) -> Result<JobHandle>;
    /// Move the linode to another plan. Completes with the request.
    async fn resize(&self, id: ProviderId, plan: &Selector) -> Result<()>;
    /// Delete every disk of the linode.
    async fn delete_disks(&self, id: ProviderId) -> Result<Vec<JobHandle>>;
    async fn delete_instance(&self, id: ProviderId) -> Result<()>;
}

/// Observes provider-side progress: job state and instance status.
#[allow(async_fn_in_trait)]
pub trait JobTracker {
    async fn job_state(&self, job: &JobHandle) -> Result<JobState>;
    async fn instance_status(&self, id: ProviderId) -> Result<InstanceStatus>;
}

/// Read-only catalog listings.
#[allow(async_fn_in_trait)]
pub trait CatalogReader {
    async fn catalog(&self, catalog: Catalog) -> Result<Vec<CatalogRow>>;
}

/// Composite trait: any type implementing the gateway and the tracker.
pub trait Provider: ProviderGateway + JobTracker {}

/// Blanket implementation: any gateway that can also track jobs is a `Provider`.
impl<T> Provider for T where T: ProviderGateway + JobTracker {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Signal a potentially long wait (spinner on a terminal).
    fn waiting(&self, message: &str) {
        self.step(message);
    }
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Interaction Port ──────────────────────────────────────────────────────────

/// Asks the operator a free-form question.
pub trait Confirmer {
    /// Show `prompt` and return the raw answer.
    fn ask(&self, prompt: &str) -> Result<String>;
}

// ── State and Config Ports ────────────────────────────────────────────────────

/// Abstracts registry persistence. Both calls are atomic from the engine's
/// point of view; the registry is always rewritten wholesale.
pub trait RegistryStore {
    /// Load the registry, returning an empty one if none exists yet.
    fn load(&self) -> Result<Registry>;
    /// Persist the full registry.
    fn save(&self, registry: &Registry) -> Result<()>;
}

/// Abstracts configuration loading.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when the file is absent.
    fn load(&self) -> Result<LinodectlConfig>;
    /// Path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
