//! Registry lookup and validation rules.
//!
//! Pure functions over `linodectl_common::Registry`: no I/O, no provider calls.

use anyhow::Result;
use linodectl_common::{Instance, Registry};

use crate::domain::error::WorkflowError;

/// An instance found in the registry together with the cluster that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub cluster: String,
    pub instance: Instance,
    /// Other clusters holding an instance with the same name, in
    /// lexicographic order. Empty unless the lookup was ambiguous.
    pub also_in: Vec<String>,
}

/// Split a `cluster/name` query. An unqualified query yields `(None, name)`.
#[must_use]
pub fn parse_query(query: &str) -> (Option<&str>, &str) {
    match query.split_once('/') {
        Some((cluster, name)) => (Some(cluster), name),
        None => (None, query),
    }
}

/// Find an instance by name across all clusters.
///
/// A cluster-qualified query (`db/db.01`) only looks in that cluster. An
/// unqualified name present in several clusters resolves to the
/// lexicographically first cluster; the others are reported in `also_in`
/// so the caller can warn.
///
/// # Errors
///
/// Returns `WorkflowError::UnknownInstance` when nothing matches.
pub fn locate(registry: &Registry, query: &str) -> Result<Located> {
    let (cluster, name) = parse_query(query);
    if let Some(cluster) = cluster {
        return registry
            .instance(cluster, name)
            .map(|instance| Located {
                cluster: cluster.to_string(),
                instance: instance.clone(),
                also_in: Vec::new(),
            })
            .ok_or_else(|| WorkflowError::UnknownInstance(query.to_string()).into());
    }

    let mut matches = registry
        .instances()
        .filter(|(_, instance)| instance.name == name);
    let Some((first_cluster, instance)) = matches.next() else {
        return Err(WorkflowError::UnknownInstance(query.to_string()).into());
    };
    Ok(Located {
        cluster: first_cluster.to_string(),
        instance: instance.clone(),
        also_in: matches.map(|(c, _)| c.to_string()).collect(),
    })
}

/// Validates an instance name chosen by the operator.
///
/// # Errors
///
/// Returns an error if the name is empty or contains `/`, which is reserved
/// for cluster qualification.
pub fn validate_instance_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(WorkflowError::MissingParameter("[name]".to_string()).into());
    }
    anyhow::ensure!(
        !name.contains('/'),
        "Invalid instance name '{name}': '/' is reserved for cluster/name lookups"
    );
    Ok(())
}

/// Check a create request against the registry before any provider call.
///
/// # Errors
///
/// Returns, in order of precedence: `MissingParameter` for an absent name or
/// cluster, `UnknownCluster` when the cluster is not in the registry, and
/// `DuplicateInstance` when the name is already taken in that cluster.
pub fn validate_create(
    registry: &Registry,
    name: Option<&str>,
    cluster: Option<&str>,
) -> Result<()> {
    let Some(name) = name else {
        return Err(WorkflowError::MissingParameter("[name]".to_string()).into());
    };
    validate_instance_name(name)?;
    let Some(cluster) = cluster.filter(|c| !c.is_empty()) else {
        return Err(WorkflowError::MissingParameter("--cluster".to_string()).into());
    };
    if !registry.has_cluster(cluster) {
        return Err(WorkflowError::UnknownCluster {
            cluster: cluster.to_string(),
            known: registry.cluster_names().collect::<Vec<_>>().join(", "),
        }
        .into());
    }
    if registry.instance(cluster, name).is_some() {
        return Err(WorkflowError::DuplicateInstance {
            name: name.to_string(),
            cluster: cluster.to_string(),
        }
        .into());
    }
    Ok(())
}
