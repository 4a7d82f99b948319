//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the loaded configuration and the
//! registry store. The provider client is built on demand so commands that
//! never touch the network do not need a credential.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore as _;
use crate::application::services::workflow::Budgets;
use crate::domain::{LinodectlConfig, WorkflowError, validate_config};
use crate::infra::config::{YamlConfigStore, linodectl_home};
use crate::infra::linode::LinodeClient;
use crate::infra::prompt::TerminalConfirmer;
use crate::infra::registry::JsonRegistryStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// API key from `--api-key` or `LINODE_API_KEY`.
    pub api_key: Option<String>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Loaded and validated configuration.
    pub config: LinodectlConfig,
    /// State directory (`$LINODECTL_HOME` or `~/.linodectl`).
    pub home: PathBuf,
    /// Where the configuration was read from.
    pub config_path: PathBuf,
    /// Cluster registry store.
    pub registry: JsonRegistryStore,
    /// Operator prompt.
    pub confirmer: TerminalConfirmer,
    api_key: Option<String>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// config file is unreadable or invalid.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let home = linodectl_home()?;
        let store = YamlConfigStore::new(&home);
        let config = store.load()?;
        validate_config(&config)?;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let api_key = flags
            .api_key
            .or_else(|| config.api_key.clone())
            .filter(|k| !k.trim().is_empty());
        tracing::debug!(home = %home.display(), has_key = api_key.is_some(), "context ready");

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            config_path: store.path()?,
            config,
            registry: JsonRegistryStore::in_home(&home),
            home,
            confirmer: TerminalConfirmer,
            api_key,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Poll budgets from the configuration.
    #[must_use]
    pub fn budgets(&self) -> Budgets {
        Budgets {
            jobs: self.config.jobs.budget(),
            readiness: self.config.readiness.budget(),
        }
    }

    /// Build the Linode API client.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::MissingCredential` when no API key is set.
    pub fn provider(&self) -> Result<LinodeClient> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            WorkflowError::MissingCredential(self.config_path.display().to_string())
        })?;
        LinodeClient::new(&self.config.api_url, key)
    }
}
