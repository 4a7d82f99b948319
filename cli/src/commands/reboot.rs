//! `linodectl reboot <name>`

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::registry_sync;
use crate::application::services::workflow::{self, InstanceAction};
use crate::commands::InstanceArgs;

/// Run `linodectl reboot`.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or the reboot chain fails.
pub async fn run(args: &InstanceArgs, app: &AppContext) -> Result<()> {
    let name = args.require_name()?;
    registry_sync::ensure_known(&app.registry, name)?;
    let provider = app.provider()?;
    workflow::run_instance_action(
        &provider,
        &app.registry,
        &app.terminal_reporter(),
        &app.confirmer,
        app.budgets(),
        name,
        InstanceAction::Reboot,
    )
    .await?;
    Ok(())
}
