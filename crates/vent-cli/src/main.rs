//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers, which receive the `CliContext`
//! built once by `bootstrap`.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use vent_cli::handlers::status::StatusArgs;
use vent_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before settings are read
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // Bootstrap the CLI context (composition root)
    let config = CliConfig::from_env(cli.manifest)?;
    let ctx = bootstrap(config)?;

    match command {
        Commands::Status {
            core,
            branch,
            version,
            json,
        } => {
            let args = StatusArgs {
                core,
                branch,
                version,
                json,
            };
            handlers::status::execute(&ctx, args).await?;
        }
        Commands::Jobs { json } => handlers::jobs::execute(&ctx, json).await?,
        Commands::Info { gpu_pull } => handlers::info::execute(&ctx, gpu_pull).await?,
        Commands::Images { all } => handlers::images::execute(&ctx, all).await?,
        Commands::Containers { all, stopped } => {
            handlers::containers::execute(&ctx, all, stopped).await?;
        }
        Commands::Services { all } => handlers::services::execute(&ctx, all).await?,
        Commands::Tools => handlers::tools::execute(&ctx)?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
    }

    Ok(())
}
