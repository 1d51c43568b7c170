use std::str::FromStr;

use alloy::primitives::{Address, U256};
use clap::Args;
use rdeploy_core::{
    abi::{format_values, ScriptArg},
    artifact::find_artifact,
    connect,
    deploy::{DeployedContract, Invocation},
    deployments::DeploymentRecord,
};

use crate::{
    commands::error::{DeployError, ProjectLocationError},
    console::print_success_message,
    project_location::ProjectLocation,
};

#[derive(Args)]
pub struct CallArgs {
    /// Network profile name
    #[clap(long, short)]
    pub network: String,

    /// Contract name, used to find the artifact and deployment record
    #[clap(long, short)]
    pub contract: String,

    /// Contract address, defaults to the recorded deployment on the network
    #[clap(long)]
    pub address: Option<String>,

    /// Signer index to send from
    #[clap(long)]
    pub from: Option<usize>,

    /// Wei to send with the call
    #[clap(long)]
    pub value: Option<String>,

    /// Method name or full signature such as `transfer(address,uint256)`
    pub method: String,

    /// Method arguments, placeholders like $signer:1 are resolved
    pub args: Vec<String>,
}

pub async fn handle_call(args: &CallArgs, project_path: &ProjectLocation) -> Result<(), DeployError> {
    let config = project_path.setup_config()?;
    let network = config.network(&args.network).map_err(ProjectLocationError::from)?;

    let address = match &args.address {
        Some(address) => Address::from_str(address)
            .map_err(|e| DeployError::InvalidArgument(format!("address {}: {}", address, e)))?,
        None => {
            DeploymentRecord::read(&project_path.deployments_dir(&config), &network.name, &args.contract)?
                .address
        }
    };

    let value = match &args.value {
        Some(value) => Some(
            U256::from_str(value)
                .map_err(|e| DeployError::InvalidArgument(format!("value {}: {}", value, e)))?,
        ),
        None => None,
    };

    let artifact = find_artifact(&project_path.artifacts_dir(&config), &args.contract)?;
    let connection = connect(project_path.path(), &config, network).await?;

    let from = match args.from {
        Some(index) => Some(connection.signer(index).ok_or_else(|| {
            DeployError::InvalidArgument(format!(
                "signer index {} out of range, network {} has {} signer(s)",
                index,
                network.name,
                connection.get_signers().len()
            ))
        })?),
        None => None,
    };

    let contract =
        DeployedContract::new(artifact.contract_name, artifact.abi, address, &connection, None);
    let context = contract.arg_context(Some(connection.default_sender()));
    let call_args: Vec<ScriptArg> = args.args.iter().map(|arg| ScriptArg::from(arg.as_str())).collect();

    match contract.invoke(&args.method, &call_args, &context, from, value).await? {
        Invocation::Call(values) => println!("{}", format_values(&values)),
        Invocation::Transaction(receipt) => print_success_message(&format!(
            "{} sent in tx {} (block {}, gas used {})",
            args.method,
            receipt.transaction_hash,
            receipt.block_number.map(|b| b.to_string()).unwrap_or_else(|| "?".to_string()),
            receipt.gas_used
        )),
    }

    Ok(())
}
