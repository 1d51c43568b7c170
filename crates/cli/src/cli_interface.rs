use clap::{Parser, Subcommand};

use crate::commands::{accounts, call, deploy, network::NetworkCommand};

#[derive(Parser)]
#[command(author, version, about = "Deploy and drive smart contracts on named network profiles", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// optional - The project directory containing rdeploy.yaml, default will be where the command is run.
    #[clap(long, short, global = true)]
    pub path: Option<String>,

    /// Show debug logs, including every RPC call
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter rdeploy.yaml and deployment script
    Init {
        /// Overwrite existing files without asking
        #[clap(long)]
        force: bool,
    },
    /// Validate rdeploy.yaml and show the compiler settings
    Config,
    /// Inspect and check network profiles
    Network {
        #[command(subcommand)]
        command: NetworkCommand,
    },
    /// List the signers of a network and their balances
    Accounts(accounts::AccountsArgs),
    /// Run a deployment script against a network
    Deploy(deploy::DeployArgs),
    /// Call a method on a deployed contract
    Call(call::CallArgs),
}
