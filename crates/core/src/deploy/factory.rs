use alloy::{
    dyn_abi::JsonAbiExt,
    json_abi::StateMutability,
    network::TransactionBuilder,
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use tracing::{info, warn};

use super::{send_and_wait, ContractError, DeployedContract, ReceiptSummary};
use crate::{
    abi::{coerce_args, ArgContext, ArgError, ScriptArg},
    artifact::ContractArtifact,
    compiler::CompilerSettings,
    provider::NetworkConnection,
};

/// Deploys one compiled contract on one network.
pub struct ContractFactory<'a> {
    artifact: ContractArtifact,
    connection: &'a NetworkConnection,
}

impl<'a> ContractFactory<'a> {
    pub fn new(artifact: ContractArtifact, connection: &'a NetworkConnection) -> Self {
        Self { artifact, connection }
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    /// Logs a warning when the artifact was built by another solc version.
    pub fn check_compiler(&self, compiler: &CompilerSettings) -> bool {
        match &self.artifact.compiler_version {
            Some(version) if !compiler.matches_artifact_version(version) => {
                warn!(
                    "{} was compiled with solc {} but the project expects {}",
                    self.artifact.contract_name, version, compiler.version
                );
                false
            }
            _ => true,
        }
    }

    fn deploy_request(
        &self,
        args: &[ScriptArg],
        context: &ArgContext,
        from: Address,
        value: Option<U256>,
    ) -> Result<TransactionRequest, ContractError> {
        let mut code = self.artifact.bytecode()?.to_vec();

        match self.artifact.abi.constructor() {
            Some(constructor) => {
                let values = coerce_args(
                    &format!("{} constructor", self.artifact.contract_name),
                    &constructor.inputs,
                    args,
                    context,
                )?;
                code.extend(constructor.abi_encode_input(&values)?);

                if value.is_some() && constructor.state_mutability != StateMutability::Payable {
                    return Err(ContractError::NotPayable(format!(
                        "{} constructor",
                        self.artifact.contract_name
                    )));
                }
            }
            None => {
                if !args.is_empty() {
                    return Err(ArgError::WrongCount {
                        context: format!("{} constructor", self.artifact.contract_name),
                        expected: 0,
                        actual: args.len(),
                    }
                    .into());
                }
                if value.is_some() {
                    return Err(ContractError::NotPayable(format!(
                        "{} constructor",
                        self.artifact.contract_name
                    )));
                }
            }
        }

        let mut tx = TransactionRequest::default().with_deploy_code(code);
        if let Some(value) = value {
            tx = tx.with_value(value);
        }

        Ok(self.connection.prepare(tx, from))
    }

    /// Simulates the deployment and returns the estimated gas.
    pub async fn estimate_deploy(
        &self,
        args: &[ScriptArg],
        context: &ArgContext,
        from: Address,
        value: Option<U256>,
    ) -> Result<u64, ContractError> {
        let tx = self.deploy_request(args, context, from, value)?;
        let name = self.artifact.contract_name.clone();

        self.connection
            .provider()
            .estimate_gas(tx)
            .await
            .map_err(|e| ContractError::DryRunFailed(format!("{} deployment", name), e))
    }

    /// Deploys the contract and waits for the deployment receipt.
    ///
    /// Unless the profile sets `skip_dry_run`, the deployment is simulated
    /// first and a failing simulation aborts before anything is broadcast.
    pub async fn deploy(
        &self,
        args: &[ScriptArg],
        context: &ArgContext,
        from: Address,
        value: Option<U256>,
    ) -> Result<DeployedContract<'a>, ContractError> {
        let name = self.artifact.contract_name.clone();

        if !self.connection.profile.skip_dry_run {
            let gas = self.estimate_deploy(args, context, from, value).await?;
            info!("Dry run of {} deployment succeeded, estimated gas {}", name, gas);
        }

        let tx = self.deploy_request(args, context, from, value)?;
        info!("Deploying {} from {} on {}", name, from, self.connection.profile.name);

        let context_name = format!("{} deployment", name);
        let receipt = send_and_wait(self.connection, tx)
            .await
            .map_err(|e| ContractError::from_send(&context_name, e))?;

        let summary = ReceiptSummary::from(&receipt);
        if !summary.status {
            return Err(ContractError::Reverted {
                context: context_name,
                hash: summary.transaction_hash,
            });
        }

        let address = summary
            .contract_address
            .ok_or(ContractError::NoContractAddress(summary.transaction_hash))?;

        info!("{} deployed to {}", name, address);

        Ok(DeployedContract::new(
            name,
            self.artifact.abi.clone(),
            address,
            self.connection,
            Some(summary),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use alloy::{
        primitives::{b256, U64},
        providers::mock::Asserter,
    };

    use super::*;
    use crate::deploy::mock::{
        connection, dwdn_artifact_json, push_mined, receipt, CONTRACT, DEPLOYER,
    };

    fn artifact() -> ContractArtifact {
        ContractArtifact::from_json(&dwdn_artifact_json(), "DWDN", Path::new("DWDN.json")).unwrap()
    }

    #[tokio::test]
    async fn test_deploy_returns_contract_at_receipt_address() {
        let asserter = Asserter::new();
        let connection = connection(&asserter);
        let factory = ContractFactory::new(artifact(), &connection);
        let hash = b256!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

        asserter.push_success(&U64::from(250_000));
        push_mined(&asserter, hash, receipt(hash, true, None, Some(CONTRACT)));

        let Ok(contract) = factory.deploy(&[], &ArgContext::default(), DEPLOYER, None).await
        else {
            panic!("deployment should succeed");
        };

        assert_eq!(contract.name, "DWDN");
        assert_eq!(contract.address, CONTRACT);
        assert_eq!(contract.deployment.map(|d| d.transaction_hash), Some(hash));
    }

    #[tokio::test]
    async fn test_reverted_deployment_is_an_error() {
        let asserter = Asserter::new();
        let connection = connection(&asserter);
        let factory = ContractFactory::new(artifact(), &connection);
        let hash = b256!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

        asserter.push_success(&U64::from(250_000));
        push_mined(&asserter, hash, receipt(hash, false, None, Some(CONTRACT)));

        let Err(err) = factory.deploy(&[], &ArgContext::default(), DEPLOYER, None).await else {
            panic!("reverted deployment should fail");
        };

        assert!(matches!(err, ContractError::Reverted { hash: h, .. } if h == hash));
    }

    #[tokio::test]
    async fn test_receipt_without_contract_address_is_an_error() {
        let asserter = Asserter::new();
        let connection = connection(&asserter);
        let factory = ContractFactory::new(artifact(), &connection);
        let hash = b256!("0xcccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc");

        asserter.push_success(&U64::from(250_000));
        push_mined(&asserter, hash, receipt(hash, true, None, None));

        let Err(err) = factory.deploy(&[], &ArgContext::default(), DEPLOYER, None).await else {
            panic!("deployment without an address should fail");
        };

        assert!(matches!(err, ContractError::NoContractAddress(h) if h == hash));
    }

    #[tokio::test]
    async fn test_failed_dry_run_sends_nothing() {
        let asserter = Asserter::new();
        let connection = connection(&asserter);
        let factory = ContractFactory::new(artifact(), &connection);

        asserter.push_failure_msg("execution reverted");

        let Err(err) = factory.deploy(&[], &ArgContext::default(), DEPLOYER, None).await else {
            panic!("failed dry run should abort the deployment");
        };

        assert!(matches!(err, ContractError::DryRunFailed(..)));
    }

    #[tokio::test]
    async fn test_constructor_args_are_checked_before_any_rpc() {
        let asserter = Asserter::new();
        let connection = connection(&asserter);
        let factory = ContractFactory::new(artifact(), &connection);

        let err = factory
            .estimate_deploy(&["unexpected".into()], &ArgContext::default(), DEPLOYER, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::Args(ArgError::WrongCount { expected: 0, .. })));
    }
}
