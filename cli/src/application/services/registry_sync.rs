//! Registry synchronizer: maps instance names to provider identity.
//!
//! `resolve` is a memoizing lookup with no persistence side effects; callers
//! decide when to write the fetched identity back. `resolve_and_cache` is the
//! caller used by every instance-bound workflow.

use anyhow::{Context, Result};
use linodectl_common::{Instance, ProviderId, Registry};

use crate::application::ports::{ProgressReporter, ProviderGateway, RegistryStore};
use crate::domain::{WorkflowError, locate};

/// A registry instance with its provider identity guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub cluster: String,
    pub instance: Instance,
    /// `true` when the identity was fetched from the provider on this call
    /// and still needs persisting.
    pub fetched: bool,
    /// Other clusters that hold an instance of the same name.
    pub also_in: Vec<String>,
}

impl Resolved {
    #[must_use]
    pub fn provider_id(&self) -> ProviderId {
        // `resolve` never returns an instance without a provider record.
        self.instance.provider_id().unwrap_or_default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.instance.name
    }
}

/// Resolve `query` to a registry instance with a provider identity.
///
/// Performs no provider call when the identity is already cached.
///
/// # Errors
///
/// Returns `WorkflowError::UnknownInstance` for a local miss,
/// `WorkflowError::InstanceNotFound` when the provider has no linode with
/// that label, or the gateway's error.
pub async fn resolve(
    gateway: &impl ProviderGateway,
    registry: &Registry,
    query: &str,
) -> Result<Resolved> {
    let located = locate(registry, query)?;
    let mut instance = located.instance;

    if instance.provider_id().is_some() {
        return Ok(Resolved {
            cluster: located.cluster,
            instance,
            fetched: false,
            also_in: located.also_in,
        });
    }

    tracing::debug!(name = %instance.name, "provider identity not cached, looking up by label");
    let record = gateway
        .find_by_label(&instance.name)
        .await
        .with_context(|| format!("looking up linode \"{}\"", instance.name))?
        .ok_or_else(|| WorkflowError::InstanceNotFound(instance.name.clone()))?;
    instance.linode = Some(record);

    Ok(Resolved {
        cluster: located.cluster,
        instance,
        fetched: true,
        also_in: located.also_in,
    })
}

/// Check that `query` names a registry instance, without touching the
/// provider.
///
/// # Errors
///
/// Returns `WorkflowError::UnknownInstance` for a local miss, or an error if
/// the registry cannot be loaded.
pub fn ensure_known(store: &impl RegistryStore, query: &str) -> Result<()> {
    let registry = store.load().context("loading cluster registry")?;
    locate(&registry, query)?;
    Ok(())
}

/// Load the registry, resolve `query`, and persist a freshly fetched
/// identity before returning.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or saved, or
/// resolution fails.
pub async fn resolve_and_cache(
    gateway: &impl ProviderGateway,
    store: &impl RegistryStore,
    reporter: &impl ProgressReporter,
    query: &str,
) -> Result<Resolved> {
    let mut registry = store.load().context("loading cluster registry")?;
    let resolved = resolve(gateway, &registry, query).await?;

    if !resolved.also_in.is_empty() {
        reporter.warn(&format!(
            "\"{}\" also exists in cluster(s) {}; using the one in \"{}\". Use cluster/name to pick another.",
            resolved.name(),
            resolved.also_in.join(", "),
            resolved.cluster
        ));
    }

    if resolved.fetched {
        registry.upsert(&resolved.cluster, resolved.instance.clone());
        store
            .save(&registry)
            .context("caching linode identity in the registry")?;
    }
    Ok(resolved)
}

/// Insert a freshly created instance and persist.
///
/// The registry is reloaded so changes made while the provider was working
/// are not lost.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or saved.
pub fn record_created(
    store: &impl RegistryStore,
    cluster: &str,
    instance: Instance,
) -> Result<()> {
    let mut registry = store.load().context("loading cluster registry")?;
    registry.upsert(cluster, instance);
    store.save(&registry).context("saving cluster registry")
}

/// Remove a destroyed instance and persist. Returns whether anything was removed.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or saved.
pub fn record_destroyed(
    store: &impl RegistryStore,
    cluster: &str,
    name: &str,
) -> Result<bool> {
    let mut registry = store.load().context("loading cluster registry")?;
    if registry.remove(cluster, name).is_none() {
        return Ok(false);
    }
    store.save(&registry).context("saving cluster registry")?;
    Ok(true)
}
