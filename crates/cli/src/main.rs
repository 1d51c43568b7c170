use std::{env, path::PathBuf, process, str::FromStr};

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::Parser;
use rdeploy_core::{load_env_from_project_path, setup_info_logger, setup_logger};
use tracing::level_filters::LevelFilter;

use crate::{
    cli_interface::{Cli, Commands},
    commands::{accounts, call, config, deploy, init, network},
    console::print_error_message,
    error::CliError,
    project_location::ProjectLocation,
};

mod cli_interface;
mod commands;
mod console;
mod error;
mod project_location;

fn resolve_path(override_path: &Option<String>) -> Result<PathBuf, String> {
    let path = match override_path {
        Some(path) => {
            PathBuf::from_str(path).map_err(|_| format!("Invalid path provided: '{}'", path))?
        }
        None => env::current_dir().map_err(|_| "Failed to get current directory.".to_string())?,
    };

    path.canonicalize().map_err(|e| format!("Failed to resolve path '{}': {}", path.display(), e))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let resolved_path = resolve_path(&cli.path).map_err(CliError::Path)?;
    load_env_from_project_path(&resolved_path);

    let project_location = ProjectLocation::new(resolved_path);

    match &cli.command {
        Commands::Init { force } => init::handle_init(project_location.path(), *force)?,
        Commands::Config => config::handle_config(&project_location)?,
        Commands::Network { command } => {
            network::handle_network(command, &project_location).await?
        }
        Commands::Accounts(args) => accounts::handle_accounts(args, &project_location).await?,
        Commands::Deploy(args) => deploy::handle_deploy(args, &project_location).await?,
        Commands::Call(args) => call::handle_call(args, &project_location).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        setup_logger(LevelFilter::DEBUG);
    } else {
        setup_info_logger();
    }

    if let Err(e) = run(cli).await {
        print_error_message(&e.to_string());
        process::exit(1);
    }
}
