use std::path::{Path, PathBuf};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    abi::{ArgContext, ScriptArg},
    artifact::{find_artifact, ArtifactError},
    deploy::{ContractError, ContractFactory, ReceiptSummary},
    deployments::{DeploymentRecord, DeploymentRecordError},
    provider::NetworkConnection,
    yaml::{read_substituted, ReadYamlError},
    ProjectConfig,
};

/// Arguments of one method invocation in a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInvocation {
    pub method: String,
    #[serde(default)]
    pub args: Vec<ScriptArg>,
    /// Index into the network's signers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<usize>,
    /// Wei sent along with the call.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<U256>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Read-only `eth_call`.
    Call(MethodInvocation),
    /// State-mutating transaction.
    Send(MethodInvocation),
}

impl ScriptStep {
    pub fn invocation(&self) -> &MethodInvocation {
        match self {
            ScriptStep::Call(invocation) | ScriptStep::Send(invocation) => invocation,
        }
    }
}

/// Deploy one contract, then run the steps against it in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployScript {
    pub contract: String,
    #[serde(default)]
    pub constructor_args: Vec<ScriptArg>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<U256>,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("{0}")]
    Read(#[from] ReadYamlError),

    #[error("Script is invalid yaml and does not match the struct - {0}")]
    InvalidYaml(String),

    #[error("Script contract name cannot be empty")]
    EmptyContract,

    #[error("Step {0} has an empty method name")]
    EmptyMethod(usize),

    #[error("Step {0} is a call but sets a value, use a send step to transfer value")]
    ValueOnCall(usize),

    #[error("Signer index {index} is out of range, network {network} has {available} signer(s)")]
    SignerOutOfRange { index: usize, network: String, available: usize },

    #[error("{0}")]
    Artifact(#[from] ArtifactError),

    #[error("{0}")]
    Contract(#[from] ContractError),

    #[error("Step {step} ({method}) failed: {source}")]
    Step { step: usize, method: String, source: ContractError },

    #[error("{0}")]
    Record(#[from] DeploymentRecordError),
}

impl DeployScript {
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let contents = read_substituted(path, false)?;
        Self::parse(&contents)
    }

    pub fn parse(yaml: &str) -> Result<Self, ScriptError> {
        let script: DeployScript =
            serde_yaml::from_str(yaml).map_err(|e| ScriptError::InvalidYaml(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.contract.trim().is_empty() {
            return Err(ScriptError::EmptyContract);
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.invocation().method.trim().is_empty() {
                return Err(ScriptError::EmptyMethod(index + 1));
            }
            if let ScriptStep::Call(invocation) = step {
                if invocation.value.is_some() {
                    return Err(ScriptError::ValueOnCall(index + 1));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only simulate the deployment, send nothing.
    pub dry_run: bool,
    /// Skip writing the deployment record.
    pub no_record: bool,
}

#[derive(Debug, Clone)]
pub enum StepOutcome {
    Call { method: String, values: Vec<DynSolValue> },
    Send { method: String, receipt: ReceiptSummary },
}

#[derive(Debug, Clone)]
pub struct ScriptReport {
    pub contract: String,
    pub network: String,
    pub signers: Vec<Address>,
    pub deployer: Address,
    /// `None` on a dry run.
    pub address: Option<Address>,
    pub deployment: Option<ReceiptSummary>,
    pub estimated_gas: Option<u64>,
    pub record_path: Option<PathBuf>,
    pub steps: Vec<StepOutcome>,
}

fn signer_at(connection: &NetworkConnection, index: usize) -> Result<Address, ScriptError> {
    connection.signer(index).ok_or_else(|| ScriptError::SignerOutOfRange {
        index,
        network: connection.profile.name.clone(),
        available: connection.get_signers().len(),
    })
}

/// Runs a deployment script: acquire signers, deploy, record, then every
/// step in order. The first failure aborts the run.
pub async fn run(
    project_path: &Path,
    config: &ProjectConfig,
    connection: &NetworkConnection,
    script: &DeployScript,
    options: &RunOptions,
) -> Result<ScriptReport, ScriptError> {
    let signers = connection.get_signers().to_vec();
    let deployer = match script.from {
        Some(index) => signer_at(connection, index)?,
        None => connection.default_sender(),
    };

    let artifact = find_artifact(&project_path.join(&config.artifacts_directory), &script.contract)?;
    let factory = ContractFactory::new(artifact, connection);
    if let Some(compiler) = &config.compiler {
        factory.check_compiler(compiler);
    }

    let mut report = ScriptReport {
        contract: factory.artifact().contract_name.clone(),
        network: connection.profile.name.clone(),
        signers: signers.clone(),
        deployer,
        address: None,
        deployment: None,
        estimated_gas: None,
        record_path: None,
        steps: Vec::with_capacity(script.steps.len()),
    };

    let context = ArgContext { signers, deployer: Some(deployer), contract: None };

    if options.dry_run {
        let gas = factory
            .estimate_deploy(&script.constructor_args, &context, deployer, script.value)
            .await?;
        info!("Dry run: {} deployment would use about {} gas", report.contract, gas);
        report.estimated_gas = Some(gas);
        return Ok(report);
    }

    let contract =
        factory.deploy(&script.constructor_args, &context, deployer, script.value).await?;
    report.address = Some(contract.address);
    report.deployment = contract.deployment.clone();

    if !options.no_record {
        if let Some(deployment) = &contract.deployment {
            let record = DeploymentRecord {
                contract_name: contract.name.clone(),
                network: connection.profile.name.clone(),
                chain_id: connection.chain_id,
                address: contract.address,
                transaction_hash: deployment.transaction_hash,
                block_number: deployment.block_number,
                deployer,
                deployed_at: Utc::now(),
            };
            let path = record.write(&project_path.join(&config.deployments_directory))?;
            info!("Recorded deployment at {}", path.display());
            report.record_path = Some(path);
        }
    }

    let context = contract.arg_context(Some(deployer));

    for (index, step) in script.steps.iter().enumerate() {
        let invocation = step.invocation();
        let from = invocation.from.map(|index| signer_at(connection, index)).transpose()?;
        let step_error = |source| ScriptError::Step {
            step: index + 1,
            method: invocation.method.clone(),
            source,
        };

        let outcome = match step {
            ScriptStep::Call(_) => {
                let values = contract
                    .call(&invocation.method, &invocation.args, &context, from)
                    .await
                    .map_err(step_error)?;
                StepOutcome::Call { method: invocation.method.clone(), values }
            }
            ScriptStep::Send(_) => {
                let receipt = contract
                    .send(&invocation.method, &invocation.args, &context, from, invocation.value)
                    .await
                    .map_err(step_error)?;
                StepOutcome::Send { method: invocation.method.clone(), receipt }
            }
        };

        report.steps.push(outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DWDN_SCRIPT: &str = r#"
contract: DWDN
steps:
  - call:
      method: getAddresses
  - send:
      method: addUserToBlacklist
      args: ["$signer:1"]
  - call:
      method: getBlackListAddresses
"#;

    #[test]
    fn test_parse_script() {
        let script = DeployScript::parse(DWDN_SCRIPT).unwrap();

        assert_eq!(script.contract, "DWDN");
        assert!(script.constructor_args.is_empty());
        assert_eq!(script.steps.len(), 3);
        assert!(matches!(&script.steps[0], ScriptStep::Call(i) if i.method == "getAddresses"));
        assert!(matches!(
            &script.steps[1],
            ScriptStep::Send(i) if i.args == vec![ScriptArg::Text("$signer:1".to_string())]
        ));
    }

    #[test]
    fn test_parse_from_and_value() {
        let script = DeployScript::parse(
            "contract: Vault\nfrom: 1\nvalue: '1000'\nsteps:\n  - send:\n      method: deposit\n      from: 2\n      value: '0x10'\n",
        )
        .unwrap();

        assert_eq!(script.from, Some(1));
        assert_eq!(script.value, Some(U256::from(1000)));
        let invocation = script.steps[0].invocation();
        assert_eq!(invocation.from, Some(2));
        assert_eq!(invocation.value, Some(U256::from(16)));
    }

    #[test]
    fn test_rejects_empty_contract_and_method() {
        assert!(matches!(DeployScript::parse("contract: ''\n"), Err(ScriptError::EmptyContract)));
        assert!(matches!(
            DeployScript::parse("contract: A\nsteps:\n  - call:\n      method: ' '\n"),
            Err(ScriptError::EmptyMethod(1))
        ));
    }

    #[test]
    fn test_rejects_value_on_call_step() {
        assert!(matches!(
            DeployScript::parse("contract: A\nsteps:\n  - call:\n      method: deposit\n      value: '10'\n"),
            Err(ScriptError::ValueOnCall(1))
        ));
    }

    #[test]
    fn test_rejects_unknown_step_kind() {
        assert!(matches!(
            DeployScript::parse("contract: A\nsteps:\n  - transfer:\n      method: x\n"),
            Err(ScriptError::InvalidYaml(_))
        ));
    }

    mod flow {
        use alloy::{
            primitives::{b256, U64},
            providers::mock::Asserter,
        };

        use super::*;
        use crate::deploy::mock::{
            connection, dwdn_artifact_json, encoded_addresses, push_mined, receipt, CONTRACT,
            DEPLOYER, OPERATOR,
        };

        fn project() -> (tempfile::TempDir, ProjectConfig) {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(dir.path().join("artifacts")).unwrap();
            std::fs::write(dir.path().join("artifacts").join("DWDN.json"), dwdn_artifact_json())
                .unwrap();

            let config: ProjectConfig = serde_yaml::from_str(
                "name: dwdn\nnetworks:\n  - name: dev\n    url: http://localhost:8545\n",
            )
            .unwrap();
            (dir, config)
        }

        #[tokio::test]
        async fn test_deploys_records_and_runs_steps_in_order() {
            let (dir, config) = project();
            let asserter = Asserter::new();
            let connection = connection(&asserter);
            let script = DeployScript::parse(DWDN_SCRIPT).unwrap();
            let deploy_hash =
                b256!("0x0101010101010101010101010101010101010101010101010101010101010101");
            let blacklist_hash =
                b256!("0x0202020202020202020202020202020202020202020202020202020202020202");

            asserter.push_success(&U64::from(250_000));
            push_mined(&asserter, deploy_hash, receipt(deploy_hash, true, None, Some(CONTRACT)));
            asserter.push_success(&encoded_addresses(&[DEPLOYER, OPERATOR]));
            push_mined(
                &asserter,
                blacklist_hash,
                receipt(blacklist_hash, true, Some(CONTRACT), None),
            );
            asserter.push_success(&encoded_addresses(&[OPERATOR]));

            let report =
                run(dir.path(), &config, &connection, &script, &RunOptions::default()).await.unwrap();

            assert_eq!(report.address, Some(CONTRACT));
            assert_eq!(report.deployer, DEPLOYER);
            assert_eq!(report.steps.len(), 3);
            assert!(matches!(
                &report.steps[0],
                StepOutcome::Call { method, values } if method == "getAddresses"
                    && values == &vec![DynSolValue::Array(vec![
                        DynSolValue::Address(DEPLOYER),
                        DynSolValue::Address(OPERATOR),
                    ])]
            ));
            assert!(matches!(
                &report.steps[1],
                StepOutcome::Send { receipt, .. } if receipt.transaction_hash == blacklist_hash
            ));
            assert!(matches!(
                &report.steps[2],
                StepOutcome::Call { values, .. }
                    if values == &vec![DynSolValue::Array(vec![DynSolValue::Address(OPERATOR)])]
            ));

            let record = DeploymentRecord::read(&dir.path().join("deployments"), "dev", "DWDN")
                .unwrap();
            assert_eq!(record.address, CONTRACT);
            assert_eq!(record.transaction_hash, deploy_hash);
        }

        #[tokio::test]
        async fn test_failing_step_stops_the_run() {
            let (dir, config) = project();
            let asserter = Asserter::new();
            let connection = connection(&asserter);
            let script = DeployScript::parse(DWDN_SCRIPT).unwrap();
            let deploy_hash =
                b256!("0x0303030303030303030303030303030303030303030303030303030303030303");
            let blacklist_hash =
                b256!("0x0404040404040404040404040404040404040404040404040404040404040404");

            asserter.push_success(&U64::from(250_000));
            push_mined(&asserter, deploy_hash, receipt(deploy_hash, true, None, Some(CONTRACT)));
            asserter.push_success(&encoded_addresses(&[DEPLOYER, OPERATOR]));
            push_mined(
                &asserter,
                blacklist_hash,
                receipt(blacklist_hash, false, Some(CONTRACT), None),
            );

            let err = run(dir.path(), &config, &connection, &script, &RunOptions::default())
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                ScriptError::Step { step: 2, source: ContractError::Reverted { .. }, .. }
            ));
        }

        #[tokio::test]
        async fn test_dry_run_only_estimates() {
            let (dir, config) = project();
            let asserter = Asserter::new();
            let connection = connection(&asserter);
            let script = DeployScript::parse(DWDN_SCRIPT).unwrap();

            asserter.push_success(&U64::from(180_000));

            let options = RunOptions { dry_run: true, no_record: false };
            let report = run(dir.path(), &config, &connection, &script, &options).await.unwrap();

            assert_eq!(report.estimated_gas, Some(180_000));
            assert!(report.address.is_none());
            assert!(report.steps.is_empty());
            assert!(!dir.path().join("deployments").exists());
        }
    }
}

