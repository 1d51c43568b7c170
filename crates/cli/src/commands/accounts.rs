use alloy::primitives::utils::format_ether;
use clap::Args;
use rdeploy_core::connect;

use crate::{
    commands::error::{NetworkError, ProjectLocationError},
    console::print_table,
    project_location::ProjectLocation,
};

#[derive(Args)]
pub struct AccountsArgs {
    /// Network profile name
    #[clap(long, short)]
    pub network: String,
}

pub async fn handle_accounts(
    args: &AccountsArgs,
    project_path: &ProjectLocation,
) -> Result<(), NetworkError> {
    let config = project_path.setup_config()?;
    let network = config.network(&args.network).map_err(ProjectLocationError::from)?;

    let connection = connect(project_path.path(), &config, network).await?;
    let default_sender = connection.default_sender();

    let mut rows = Vec::with_capacity(connection.get_signers().len());
    for (index, address) in connection.get_signers().iter().enumerate() {
        let balance = connection.balance_of(*address).await?;
        let marker = if *address == default_sender { "*" } else { "" };
        rows.push(vec![
            index.to_string(),
            address.to_checksum(None),
            format!("{} ETH", format_ether(balance)),
            marker.to_string(),
        ]);
    }

    print_table(
        vec!["Index", "Address", "Balance", "Default"],
        rows,
        Some(&format!("Signers on {} (chain id {})", network.name, connection.chain_id)),
    );

    Ok(())
}
