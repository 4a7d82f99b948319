//! `linodectl resize <name> [--plan-id ID | --plan-slug NAME]`

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::registry_sync;
use crate::application::services::workflow::{self, InstanceAction, require_plan};
use crate::commands::InstanceArgs;

/// Arguments for the resize command.
#[derive(Args, Debug, Default)]
pub struct ResizeArgs {
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Target plan id (preferred over --plan-slug)
    #[arg(long, value_name = "ID")]
    pub plan_id: Option<u64>,

    /// Target plan by RAM in MB (e.g. 4096) or label
    #[arg(long, value_name = "NAME")]
    pub plan_slug: Option<String>,
}

/// Run `linodectl resize`.
///
/// The plan is checked before the instance is resolved, so a missing plan
/// fails without touching the provider.
///
/// # Errors
///
/// Returns `MissingParameter` when no plan is given, or the resize error.
pub async fn run(args: &ResizeArgs, app: &AppContext) -> Result<()> {
    let name = args.instance.require_name()?;
    let plan = require_plan(args.plan_id, args.plan_slug.as_deref())?;
    registry_sync::ensure_known(&app.registry, name)?;
    let provider = app.provider()?;
    workflow::run_instance_action(
        &provider,
        &app.registry,
        &app.terminal_reporter(),
        &app.confirmer,
        app.budgets(),
        name,
        InstanceAction::Resize(plan),
    )
    .await?;
    Ok(())
}
