//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::LinodectlConfig;

/// Overrides the state directory (`~/.linodectl` by default).
pub const HOME_ENV: &str = "LINODECTL_HOME";
pub const CONFIG_FILE: &str = "config.yaml";

/// Resolve the state directory holding the registry and config file.
///
/// # Errors
///
/// Returns an error if `LINODECTL_HOME` is unset and the home directory
/// cannot be determined.
pub fn linodectl_home() -> Result<PathBuf> {
    if let Some(val) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(val));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".linodectl"))
}

/// `ConfigStore` backed by `<home>/config.yaml`.
pub struct YamlConfigStore {
    home: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<LinodectlConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(LinodectlConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(LinodectlConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(self.home.join(CONFIG_FILE))
    }
}
