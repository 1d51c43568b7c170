use alloy::providers::Provider;
use clap::Subcommand;
use rdeploy_core::{connect, provider::SignerSource};

use crate::{
    commands::error::NetworkError,
    console::{print_success_message, print_table},
    project_location::ProjectLocation,
};

#[derive(Subcommand)]
pub enum NetworkCommand {
    /// List the network profiles in rdeploy.yaml
    List,
    /// Connect to a network and verify it is the one configured
    Check {
        /// Network profile name
        name: String,
    },
}

pub async fn handle_network(
    command: &NetworkCommand,
    project_path: &ProjectLocation,
) -> Result<(), NetworkError> {
    match command {
        NetworkCommand::List => handle_list(project_path),
        NetworkCommand::Check { name } => handle_check(name, project_path).await,
    }
}

fn handle_list(project_path: &ProjectLocation) -> Result<(), NetworkError> {
    let config = project_path.setup_config()?;
    let unsubstituted = project_path.unsubstituted_endpoints()?;

    let rows = config
        .networks
        .iter()
        .map(|network| {
            let signing = match config.signing_key_for(network) {
                Some(key) => key.method().to_string(),
                None => "node accounts".to_string(),
            };

            vec![
                network.name.clone(),
                unsubstituted
                    .get(&network.name)
                    .cloned()
                    .unwrap_or_else(|| network.rpc_url().unwrap_or_default()),
                network.network_id.to_string(),
                network.chain_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                network.gas_price.map(|price| price.to_string()).unwrap_or_else(|| "auto".to_string()),
                network.gas.map(|gas| gas.to_string()).unwrap_or_else(|| "estimate".to_string()),
                signing,
            ]
        })
        .collect();

    print_table(
        vec!["Name", "Endpoint", "Network Id", "Chain Id", "Gas Price", "Gas Limit", "Signing"],
        rows,
        Some(&format!("Networks of {}", config.name)),
    );

    Ok(())
}

async fn handle_check(name: &str, project_path: &ProjectLocation) -> Result<(), NetworkError> {
    let config = project_path.setup_config()?;
    let network = config.network(name).map_err(crate::commands::error::ProjectLocationError::from)?;

    let connection = connect(project_path.path(), &config, network).await?;
    let block_number = connection.provider().get_block_number().await?;

    let source = match connection.signer_source {
        SignerSource::Local => "local keys",
        SignerSource::Node => "node accounts",
    };

    print_success_message(&format!(
        "Network {} is reachable: chain id {}, block {}, {} signer(s) from {}",
        network.name,
        connection.chain_id,
        block_number,
        connection.get_signers().len(),
        source
    ));

    Ok(())
}
