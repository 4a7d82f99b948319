//! Workflow orchestrator: the six lifecycle operations.
//!
//! Each operation is a fixed chain of gateway calls, job waits and readiness
//! waits. A failed step aborts the rest of the chain; nothing is rolled back.
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::{Context, Result};
use chrono::Utc;
use linodectl_common::Instance;

use crate::application::ports::{
    Confirmer, CreateSpec, ProgressReporter, Provider, RegistryStore, Selector,
};
use crate::application::services::gate::confirm_destroy;
use crate::application::services::job_poller::wait_for_jobs;
use crate::application::services::readiness::wait_until_running;
use crate::application::services::registry_sync::{
    Resolved, record_created, record_destroyed, resolve_and_cache,
};
use crate::domain::{PollBudget, WorkflowError, validate_create};

/// Poll budgets for one workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub jobs: PollBudget,
    pub readiness: PollBudget,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Parameters of a create request, before validation.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub name: Option<String>,
    pub cluster: Option<String>,
    pub datacenter: Selector,
    pub distribution: Selector,
    pub kernel: Selector,
    pub plan: Selector,
    pub payment_term: u32,
    pub root_password: String,
    /// Private key path recorded on the instance.
    pub ssh_key: String,
    pub ssh_public_key: Option<String>,
}

/// Run the create validation rules against the stored registry.
///
/// Commands call this before building a provider client, so a bad request
/// never depends on the credential or the key files.
///
/// # Errors
///
/// Returns `MissingParameter`, `UnknownCluster` or `DuplicateInstance`, or an
/// error if the registry cannot be loaded.
pub fn check_create(
    store: &impl RegistryStore,
    name: Option<&str>,
    cluster: Option<&str>,
) -> Result<()> {
    let registry = store.load().context("loading cluster registry")?;
    validate_create(&registry, name, cluster)
}

/// Create a linode and register it once it is running.
///
/// The registry is only written after the provider reports the instance
/// running; any earlier failure leaves it untouched.
///
/// # Errors
///
/// Returns `MissingParameter`, `UnknownCluster` or `DuplicateInstance`
/// before any provider call, or the first provider/job/timeout error.
pub async fn create(
    provider: &impl Provider,
    store: &impl RegistryStore,
    reporter: &impl ProgressReporter,
    budgets: Budgets,
    request: CreateRequest,
) -> Result<(String, Instance)> {
    let registry = store.load().context("loading cluster registry")?;
    validate_create(&registry, request.name.as_deref(), request.cluster.as_deref())?;
    let (Some(name), Some(cluster)) = (request.name, request.cluster) else {
        anyhow::bail!("create request is missing a name or cluster");
    };

    reporter.step(&format!("creating linode \"{name}\"..."));
    let spec = CreateSpec {
        label: name.clone(),
        datacenter: request.datacenter,
        distribution: request.distribution,
        kernel: request.kernel,
        plan: request.plan,
        payment_term: request.payment_term,
        root_password: request.root_password,
        ssh_public_key: request.ssh_public_key,
    };
    let provisioned = provider
        .create(&spec)
        .await
        .with_context(|| format!("creating linode \"{name}\""))?;
    tracing::info!(linode = provisioned.record.id, jobs = provisioned.jobs.len(), "linode created");

    reporter.waiting("waiting for provisioning jobs...");
    wait_for_jobs(provider, &provisioned.jobs, budgets.jobs).await?;
    reporter.waiting("waiting for linode to boot...");
    wait_until_running(provider, provisioned.record.id, budgets.readiness).await?;

    let instance = Instance {
        ip: provisioned.ip,
        linode: Some(provisioned.record),
        ssh_key: request.ssh_key,
        created_at: Some(Utc::now()),
        ..Instance::new(name.as_str())
    };
    record_created(store, &cluster, instance.clone())?;
    reporter.success(&format!(
        "Instance \"{name}\" ({}) saved.",
        instance.ip.as_deref().unwrap_or("no public ip")
    ));
    Ok((cluster, instance))
}

// ── instance-bound operations ─────────────────────────────────────────────────

/// An operation on an existing registry instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceAction {
    Boot,
    Reboot,
    Shutdown,
    Resize(Selector),
    Destroy { force: bool },
}

/// Terminal outcome of an instance-bound operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Booted,
    Rebooted,
    ShutDown,
    Resized,
    Destroyed,
    /// The operator declined the destroy prompt; nothing was touched.
    DestroyDeclined,
    /// The destroy chain failed part-way; the registry entry was removed anyway.
    DestroyedWithErrors { detail: String },
}

/// Resolve `query` and run `action` on it.
///
/// # Errors
///
/// Returns resolution errors, or the first provider/job/timeout error of the
/// action's chain. A failed destroy chain is reported as
/// `Outcome::DestroyedWithErrors` instead.
pub async fn run_instance_action(
    provider: &impl Provider,
    store: &impl RegistryStore,
    reporter: &impl ProgressReporter,
    confirmer: &impl Confirmer,
    budgets: Budgets,
    query: &str,
    action: InstanceAction,
) -> Result<Outcome> {
    let resolved = resolve_and_cache(provider, store, reporter, query).await?;
    tracing::info!(
        name = resolved.name(),
        cluster = %resolved.cluster,
        linode = resolved.provider_id(),
        ?action,
        "running instance action"
    );

    match action {
        InstanceAction::Boot => {
            boot(provider, reporter, budgets, &resolved).await?;
            Ok(Outcome::Booted)
        }
        InstanceAction::Reboot => {
            reboot(provider, reporter, budgets, &resolved).await?;
            Ok(Outcome::Rebooted)
        }
        InstanceAction::Shutdown => {
            shutdown(provider, reporter, budgets, &resolved).await?;
            Ok(Outcome::ShutDown)
        }
        InstanceAction::Resize(plan) => {
            resize(provider, reporter, &resolved, &plan).await?;
            Ok(Outcome::Resized)
        }
        InstanceAction::Destroy { force } => {
            destroy(provider, store, reporter, confirmer, budgets, &resolved, force).await
        }
    }
}

/// Boot a powered-off linode and wait until it is running.
///
/// # Errors
///
/// Returns the provider, job or timeout error that stopped the chain.
pub async fn boot(
    provider: &impl Provider,
    reporter: &impl ProgressReporter,
    budgets: Budgets,
    resolved: &Resolved,
) -> Result<()> {
    let id = resolved.provider_id();
    reporter.step(&format!("booting \"{}\"...", resolved.name()));
    let job = provider.boot(id).await.context("booting linode")?;
    reporter.waiting("waiting for boot job...");
    wait_for_jobs(provider, &[job], budgets.jobs).await?;
    reporter.waiting("waiting for linode to report running...");
    wait_until_running(provider, id, budgets.readiness).await?;
    reporter.success(&format!("\"{}\" is running.", resolved.name()));
    Ok(())
}

/// Reboot a linode and wait until it is running again.
///
/// # Errors
///
/// Returns the provider, job or timeout error that stopped the chain.
pub async fn reboot(
    provider: &impl Provider,
    reporter: &impl ProgressReporter,
    budgets: Budgets,
    resolved: &Resolved,
) -> Result<()> {
    let id = resolved.provider_id();
    reporter.step(&format!("rebooting \"{}\"...", resolved.name()));
    let job = provider.reboot(id).await.context("rebooting linode")?;
    reporter.waiting("waiting for reboot job...");
    wait_for_jobs(provider, &[job], budgets.jobs).await?;
    reporter.waiting("waiting for linode to report running...");
    wait_until_running(provider, id, budgets.readiness).await?;
    reporter.success(&format!("\"{}\" rebooted.", resolved.name()));
    Ok(())
}

/// Shut a linode down. No readiness wait.
///
/// # Errors
///
/// Returns the provider, job or timeout error that stopped the chain.
pub async fn shutdown(
    provider: &impl Provider,
    reporter: &impl ProgressReporter,
    budgets: Budgets,
    resolved: &Resolved,
) -> Result<()> {
    reporter.step(&format!("shutting down \"{}\"...", resolved.name()));
    let job = provider
        .shutdown(resolved.provider_id())
        .await
        .context("shutting down linode")?;
    reporter.waiting("waiting for shutdown job...");
    wait_for_jobs(provider, &[job], budgets.jobs).await?;
    reporter.success("OK, server is shutdown.");
    Ok(())
}

/// Resize a linode. Reported complete as soon as the provider accepts it.
///
/// # Errors
///
/// Returns the provider error.
pub async fn resize(
    provider: &impl Provider,
    reporter: &impl ProgressReporter,
    resolved: &Resolved,
    plan: &Selector,
) -> Result<()> {
    reporter.step(&format!("resizing \"{}\" to plan {plan}...", resolved.name()));
    provider
        .resize(resolved.provider_id(), plan)
        .await
        .context("resizing linode")?;
    reporter.success("Linode resized.");
    Ok(())
}

/// Destroy a linode: gate, shutdown, wait, delete disks, delete instance,
/// then drop it from the registry.
///
/// The registry entry is removed even when the provider chain fails part-way,
/// since the linode may already be unreachable. That case is warned about
/// and reported as `Outcome::DestroyedWithErrors`.
///
/// # Errors
///
/// Returns an error if the prompt fails or the registry cannot be updated.
pub async fn destroy(
    provider: &impl Provider,
    store: &impl RegistryStore,
    reporter: &impl ProgressReporter,
    confirmer: &impl Confirmer,
    budgets: Budgets,
    resolved: &Resolved,
    force: bool,
) -> Result<Outcome> {
    if !confirm_destroy(confirmer, force)? {
        reporter.step("No action taken.");
        return Ok(Outcome::DestroyDeclined);
    }

    let chain = destroy_chain(provider, reporter, budgets, resolved).await;
    if let Err(e) = &chain {
        reporter.warn(&format!(
            "destroying \"{}\" did not complete: {e:#}",
            resolved.name()
        ));
        reporter.warn("removing it from the registry anyway; check the Linode manager for leftovers.");
    }

    let removed = match &chain {
        Ok(()) => record_destroyed(store, &resolved.cluster, resolved.name())?,
        Err(e) => record_destroyed(store, &resolved.cluster, resolved.name()).with_context(|| {
            format!("destroying \"{}\" had already failed: {e:#}", resolved.name())
        })?,
    };
    if removed {
        reporter.success(&format!(
            "Instance \"{}\" removed from cluster \"{}\".",
            resolved.name(),
            resolved.cluster
        ));
    }

    match chain {
        Ok(()) => Ok(Outcome::Destroyed),
        Err(e) => Ok(Outcome::DestroyedWithErrors {
            detail: format!("{e:#}"),
        }),
    }
}

async fn destroy_chain(
    provider: &impl Provider,
    reporter: &impl ProgressReporter,
    budgets: Budgets,
    resolved: &Resolved,
) -> Result<()> {
    let id = resolved.provider_id();
    reporter.step(&format!("shutting down \"{}\"...", resolved.name()));
    let job = provider.shutdown(id).await.context("shutting down linode")?;
    reporter.waiting("waiting for shutdown job...");
    wait_for_jobs(provider, &[job], budgets.jobs).await?;

    reporter.step("deleting disks...");
    let disk_jobs = provider.delete_disks(id).await.context("deleting disks")?;
    tracing::debug!(linode = id, jobs = disk_jobs.len(), "disk deletion issued");

    reporter.step("deleting linode...");
    provider
        .delete_instance(id)
        .await
        .context("deleting linode")?;
    reporter.success(&format!("Linode \"{}\" deleted.", resolved.name()));
    Ok(())
}

/// Map a missing resize plan to the typed error.
///
/// # Errors
///
/// Returns `WorkflowError::MissingParameter` when neither flag is set.
pub fn require_plan(id: Option<u64>, slug: Option<&str>) -> Result<Selector> {
    Selector::from_options(id, slug)
        .ok_or_else(|| WorkflowError::MissingParameter("--plan-id or --plan-slug".into()).into())
}
