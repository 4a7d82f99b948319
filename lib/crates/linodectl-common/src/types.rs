use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque provider-side identifier of a linode.
pub type ProviderId = u64;

pub const DEFAULT_SSH_KEY: &str = "overcast.key";
pub const DEFAULT_SSH_PORT: &str = "22";
pub const DEFAULT_USER: &str = "root";

/// Cached provider-side record of an instance.
///
/// Only `id` is load-bearing; the rest is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderRecord {
    pub id: ProviderId,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<u64>,
}

/// A named instance tracked in the local registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instance {
    pub name: String,
    /// Public network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Path of the private key used to reach the instance.
    #[serde(default = "default_ssh_key")]
    pub ssh_key: String,
    #[serde(default = "default_ssh_port")]
    pub ssh_port: String,
    #[serde(default = "default_user")]
    pub user: String,
    /// Provider identity cache, filled lazily on first use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linode: Option<ProviderRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Instance {
    /// A bare instance with default connection settings and no provider identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: None,
            ssh_key: default_ssh_key(),
            ssh_port: default_ssh_port(),
            user: default_user(),
            linode: None,
            created_at: None,
        }
    }

    /// The cached provider identifier, if resolved.
    #[must_use]
    pub fn provider_id(&self) -> Option<ProviderId> {
        self.linode.as_ref().map(|l| l.id)
    }
}

fn default_ssh_key() -> String {
    DEFAULT_SSH_KEY.to_string()
}

fn default_ssh_port() -> String {
    DEFAULT_SSH_PORT.to_string()
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

/// A named grouping of instances. Purely organizational.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    #[serde(default)]
    pub instances: BTreeMap<String, Instance>,
}

/// The persisted mapping of cluster name to cluster.
///
/// Ordered maps keep the on-disk file stable and make cross-cluster lookups
/// deterministic (lexicographic cluster order).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Registry {
    clusters: BTreeMap<String, Cluster>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.get(name)
    }

    #[must_use]
    pub fn has_cluster(&self, name: &str) -> bool {
        self.clusters.contains_key(name)
    }

    /// Cluster names in lexicographic order.
    pub fn cluster_names(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }

    /// All `(cluster, instance)` pairs in lexicographic cluster order.
    pub fn instances(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.clusters.iter().flat_map(|(cluster, c)| {
            c.instances.values().map(move |i| (cluster.as_str(), i))
        })
    }

    #[must_use]
    pub fn instance(&self, cluster: &str, name: &str) -> Option<&Instance> {
        self.clusters.get(cluster)?.instances.get(name)
    }

    /// Add an empty cluster if it does not exist yet.
    pub fn ensure_cluster(&mut self, name: &str) -> &mut Cluster {
        self.clusters.entry(name.to_string()).or_default()
    }

    /// Insert or replace an instance, creating the cluster when absent.
    pub fn upsert(&mut self, cluster: &str, instance: Instance) {
        self.ensure_cluster(cluster)
            .instances
            .insert(instance.name.clone(), instance);
    }

    /// Remove an instance; the cluster itself is kept even when it empties.
    pub fn remove(&mut self, cluster: &str, name: &str) -> Option<Instance> {
        self.clusters.get_mut(cluster)?.instances.remove(name)
    }
}
