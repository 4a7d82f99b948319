//! `linodectl destroy <name> [--force]`: delete a linode and forget it.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::registry_sync;
use crate::application::services::workflow::{self, InstanceAction, Outcome};
use crate::commands::InstanceArgs;

/// Arguments for the destroy command.
#[derive(Args, Debug, Default)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Do not ask for confirmation
    #[arg(long)]
    pub force: bool,
}

/// Run `linodectl destroy`.
///
/// A declined prompt is a successful no-op. A chain that failed part-way
/// still drops the registry entry but fails the command.
///
/// # Errors
///
/// Returns an error if resolution fails, the prompt cannot be read, or the
/// provider-side destroy did not complete.
pub async fn run(args: &DestroyArgs, app: &AppContext) -> Result<()> {
    let name = args.instance.require_name()?;
    registry_sync::ensure_known(&app.registry, name)?;
    let provider = app.provider()?;
    let outcome = workflow::run_instance_action(
        &provider,
        &app.registry,
        &app.terminal_reporter(),
        &app.confirmer,
        app.budgets(),
        name,
        InstanceAction::Destroy { force: args.force },
    )
    .await?;

    match outcome {
        Outcome::DestroyedWithErrors { detail } => {
            anyhow::bail!("\"{name}\" was removed from the registry but not fully destroyed: {detail}")
        }
        _ => Ok(()),
    }
}
