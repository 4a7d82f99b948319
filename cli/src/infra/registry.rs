//! Infrastructure implementation of the `RegistryStore` port.
//!
//! `JsonRegistryStore` keeps the cluster registry in `<home>/clusters.json`
//! and rewrites it atomically (temp file + rename) so a crash mid-save never
//! leaves a truncated registry behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use linodectl_common::Registry;

use crate::application::ports::RegistryStore;

pub const REGISTRY_FILE: &str = "clusters.json";

/// Registry file manager.
pub struct JsonRegistryStore {
    path: PathBuf,
}

impl JsonRegistryStore {
    /// Store backed by `<home>/clusters.json`.
    #[must_use]
    pub fn in_home(home: &Path) -> Self {
        Self::with_path(home.join(REGISTRY_FILE))
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonRegistryStore {
    fn load(&self) -> Result<Registry> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no registry file, starting empty");
            return Ok(Registry::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading registry {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Registry::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parsing registry {}", self.path.display()))
    }

    fn save(&self, registry: &Registry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(registry).context("serializing registry")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing registry {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "registry saved");
        Ok(())
    }
}
