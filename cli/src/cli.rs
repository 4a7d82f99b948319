//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::application::ports::Catalog;
use crate::commands;
use crate::domain::Operation;

/// Drive the lifecycle of Linode instances tracked in a local cluster registry
#[derive(Parser)]
#[command(
    name = "linodectl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Linode API key
    #[arg(long, global = true, env = "LINODE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Boot a powered-off instance and wait until it is running
    Boot(commands::InstanceArgs),

    /// Create a new Linode and add it to a cluster
    Create(commands::create::CreateArgs),

    /// List datacenters
    Datacenters,

    /// Shut down, delete and forget an instance
    Destroy(commands::destroy::DestroyArgs),

    /// List distributions
    Distributions,

    /// List kernels
    Kernels,

    /// List linodes in your account
    Linodes,

    /// List plans
    Plans,

    /// Reboot an instance and wait until it is running
    Reboot(commands::InstanceArgs),

    /// Move an instance to another plan
    Resize(commands::resize::ResizeArgs),

    /// Shut an instance down
    Shutdown(commands::InstanceArgs),

    /// Print the usage line of every operation
    Signatures,

    /// Show version
    Version,
}

impl Command {
    /// The table entry behind this subcommand, if it is a provider operation.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        let op = match self {
            Command::Boot(_) => Operation::Boot,
            Command::Create(_) => Operation::Create,
            Command::Datacenters => Operation::Datacenters,
            Command::Destroy(_) => Operation::Destroy,
            Command::Distributions => Operation::Distributions,
            Command::Kernels => Operation::Kernels,
            Command::Linodes => Operation::Linodes,
            Command::Plans => Operation::Plans,
            Command::Reboot(_) => Operation::Reboot,
            Command::Resize(_) => Operation::Resize,
            Command::Shutdown(_) => Operation::Shutdown,
            Command::Signatures | Command::Version => return None,
        };
        Some(op)
    }
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            api_key,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            api_key,
        })?;

        if let Some(op) = command.operation() {
            tracing::debug!(
                operation = %op,
                requires_instance = op.requires_instance(),
                destructive = op.is_destructive(),
                "dispatching"
            );
        }

        match command {
            Command::Boot(args) => commands::boot::run(&args, &app).await,
            Command::Create(args) => commands::create::run(args, &app).await,
            Command::Destroy(args) => commands::destroy::run(&args, &app).await,
            Command::Reboot(args) => commands::reboot::run(&args, &app).await,
            Command::Resize(args) => commands::resize::run(&args, &app).await,
            Command::Shutdown(args) => commands::shutdown::run(&args, &app).await,
            Command::Datacenters => commands::catalog::run(Catalog::Datacenters, &app).await,
            Command::Distributions => commands::catalog::run(Catalog::Distributions, &app).await,
            Command::Kernels => commands::catalog::run(Catalog::Kernels, &app).await,
            Command::Linodes => commands::catalog::run(Catalog::Linodes, &app).await,
            Command::Plans => commands::catalog::run(Catalog::Plans, &app).await,
            Command::Signatures => commands::signatures::run(&app),
            Command::Version => commands::version::run(&app),
        }
    }
}
