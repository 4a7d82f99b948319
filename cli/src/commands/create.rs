//! `linodectl create <name> --cluster <cluster> [options]`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use linodectl_common::DEFAULT_SSH_KEY;

use crate::app::AppContext;
use crate::application::ports::Selector;
use crate::application::services::workflow::{self, CreateRequest};
use crate::infra::password::generate_root_password;

pub const DEFAULT_DATACENTER: &str = "newark";
pub const DEFAULT_DISTRIBUTION: &str = "ubuntu-14-04-lts";
pub const DEFAULT_KERNEL: &str = "Latest 64 bit";
pub const DEFAULT_PLAN: &str = "2048";
pub const DEFAULT_SSH_PUB_KEY: &str = "overcast.key.pub";

/// Arguments for the create command.
#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Name of the new instance
    pub name: Option<String>,

    /// Registry cluster to add the instance to
    #[arg(long)]
    pub cluster: Option<String>,

    #[arg(long, value_name = "ID")]
    pub datacenter_id: Option<u64>,
    /// Datacenter abbreviation [default: newark]
    #[arg(long, value_name = "NAME")]
    pub datacenter_slug: Option<String>,

    #[arg(long, value_name = "ID")]
    pub distribution_id: Option<u64>,
    /// Distribution label as a slug [default: ubuntu-14-04-lts]
    #[arg(long, value_name = "NAME")]
    pub distribution_slug: Option<String>,

    #[arg(long, value_name = "ID")]
    pub kernel_id: Option<u64>,
    /// Kernel label or label prefix [default: "Latest 64 bit"]
    #[arg(long, value_name = "NAME")]
    pub kernel_name: Option<String>,

    #[arg(long, value_name = "ID")]
    pub plan_id: Option<u64>,
    /// Plan RAM in MB or plan label [default: 2048]
    #[arg(long, value_name = "NAME")]
    pub plan_slug: Option<String>,

    /// Billing term in months
    #[arg(long, value_name = "ID", default_value_t = 1)]
    pub payment_term: u32,

    /// Root password [default: randomly generated]
    #[arg(long)]
    pub password: Option<String>,

    /// Private key used to reach the instance
    #[arg(long, value_name = "KEY_PATH", default_value = DEFAULT_SSH_KEY)]
    pub ssh_key: String,

    /// Public key installed for root [default: overcast.key.pub]
    #[arg(long, value_name = "KEY_PATH")]
    pub ssh_pub_key: Option<PathBuf>,
}

/// Run `linodectl create`.
///
/// # Errors
///
/// Returns a validation error before any provider call, an error if an
/// explicitly given public key cannot be read, or the first provider error.
pub async fn run(args: CreateArgs, app: &AppContext) -> Result<()> {
    workflow::check_create(&app.registry, args.name.as_deref(), args.cluster.as_deref())?;
    let provider = app.provider()?;
    let ssh_public_key = read_public_key(&app.home, args.ssh_pub_key.as_deref())?;

    let request = CreateRequest {
        datacenter: Selector::or_default(
            args.datacenter_id,
            args.datacenter_slug.as_deref(),
            DEFAULT_DATACENTER,
        ),
        distribution: Selector::or_default(
            args.distribution_id,
            args.distribution_slug.as_deref(),
            DEFAULT_DISTRIBUTION,
        ),
        kernel: Selector::or_default(args.kernel_id, args.kernel_name.as_deref(), DEFAULT_KERNEL),
        plan: Selector::or_default(args.plan_id, args.plan_slug.as_deref(), DEFAULT_PLAN),
        payment_term: args.payment_term,
        root_password: args.password.unwrap_or_else(generate_root_password),
        ssh_key: args.ssh_key,
        ssh_public_key,
        name: args.name,
        cluster: args.cluster,
    };

    workflow::create(
        &provider,
        &app.registry,
        &app.terminal_reporter(),
        app.budgets(),
        request,
    )
    .await?;
    Ok(())
}

/// Relative key paths live under `<home>/keys`.
#[must_use]
pub fn key_path(home: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join("keys").join(path)
    }
}

/// Read the public key. A missing default key is skipped; a missing
/// explicit key is an error.
fn read_public_key(home: &Path, explicit: Option<&Path>) -> Result<Option<String>> {
    let path = key_path(home, explicit.unwrap_or(Path::new(DEFAULT_SSH_PUB_KEY)));
    if explicit.is_none() && !path.exists() {
        tracing::debug!(path = %path.display(), "no default public key, creating without one");
        return Ok(None);
    }
    let key = std::fs::read_to_string(&path)
        .with_context(|| format!("reading public key {}", path.display()))?;
    Ok(Some(key.trim().to_string()))
}
