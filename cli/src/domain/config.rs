//! Domain types and validators for linodectl configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_API_URL: &str = "https://api.linode.com/";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `<home>/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinodectlConfig {
    /// Base URL of the Linode API.
    pub api_url: String,
    /// API credential. `LINODE_API_KEY` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Budget for waiting on provider jobs.
    pub jobs: PollSettings,
    /// Budget for waiting on the instance to report running.
    pub readiness: PollSettings,
}

impl Default for LinodectlConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            jobs: PollSettings {
                interval_secs: 3,
                max_attempts: 200,
            },
            readiness: PollSettings {
                interval_secs: 5,
                max_attempts: 60,
            },
        }
    }
}

/// Poll loop settings as written in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollSettings {
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl PollSettings {
    #[must_use]
    pub fn budget(self) -> PollBudget {
        PollBudget {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts,
        }
    }
}

/// Bound on a poll loop: a fixed interval between rounds and a maximum
/// number of rounds before the wait fails with a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollBudget {
    #[must_use]
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns an error if the API URL is not http(s) or a poll budget allows
/// zero attempts.
pub fn validate_config(config: &LinodectlConfig) -> Result<()> {
    if !(config.api_url.starts_with("https://") || config.api_url.starts_with("http://")) {
        return Err(ConfigError::InvalidValue {
            key: "api_url".to_string(),
            value: config.api_url.clone(),
            valid: "an http:// or https:// URL".to_string(),
        }
        .into());
    }
    for (key, settings) in [("jobs", config.jobs), ("readiness", config.readiness)] {
        if settings.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: format!("{key}.max_attempts"),
                value: "0".to_string(),
                valid: "1 or more".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
