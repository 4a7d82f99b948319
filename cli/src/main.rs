//! linodectl: provision and drive Linode instances from a local cluster registry

use clap::Parser;
use tracing_subscriber::EnvFilter;

use linodectl_cli::cli::Cli;
use linodectl_cli::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json_errors = cli.json;
    if let Err(e) = cli.run().await {
        if json_errors {
            let message = format!("{e:#}");
            match json::format_error(&message, json::error_code(&e)) {
                Ok(out) => println!("{out}"),
                Err(_) => eprintln!("Error: {message}"),
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr. `RUST_LOG` wins; `-v` raises the default to debug.
fn init_tracing(verbose: bool) {
    let default = if verbose { "linodectl_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
