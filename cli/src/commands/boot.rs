//! `linodectl boot <name>`: boot a powered-off linode.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::registry_sync;
use crate::application::services::workflow::{self, InstanceAction};
use crate::commands::InstanceArgs;

/// Run `linodectl boot`.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or the boot chain fails.
pub async fn run(args: &InstanceArgs, app: &AppContext) -> Result<()> {
    let name = args.require_name()?;
    registry_sync::ensure_known(&app.registry, name)?;
    let provider = app.provider()?;
    let reporter = app.terminal_reporter();
    workflow::run_instance_action(
        &provider,
        &app.registry,
        &reporter,
        &app.confirmer,
        app.budgets(),
        name,
        InstanceAction::Boot,
    )
    .await?;
    Ok(())
}
