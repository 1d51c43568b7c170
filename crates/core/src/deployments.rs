use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{file::write_file, network::ChainId, WriteFileError};

#[derive(Error, Debug)]
pub enum DeploymentRecordError {
    #[error("No deployment of {contract} recorded for network {network}")]
    NotFound { contract: String, network: String },

    #[error("Could not read deployment record {0}: {1}")]
    CanNotRead(String, std::io::Error),

    #[error("Deployment record {0} is invalid: {1}")]
    Invalid(String, serde_json::Error),

    #[error("Could not serialize deployment record: {0}")]
    Serialize(serde_json::Error),

    #[error("Could not write deployment record: {0}")]
    Write(#[from] WriteFileError),
}

/// Where and when a contract was deployed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub network: String,
    pub chain_id: ChainId,
    pub address: Address,
    pub transaction_hash: TxHash,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub block_number: Option<u64>,
    pub deployer: Address,
    pub deployed_at: DateTime<Utc>,
}

impl DeploymentRecord {
    /// `<deployments_dir>/<network>/<contract>.json`
    pub fn path(deployments_dir: &Path, network: &str, contract_name: &str) -> PathBuf {
        deployments_dir.join(network).join(format!("{}.json", contract_name))
    }

    pub fn write(&self, deployments_dir: &Path) -> Result<PathBuf, DeploymentRecordError> {
        let path = Self::path(deployments_dir, &self.network, &self.contract_name);
        let json = serde_json::to_string_pretty(self).map_err(DeploymentRecordError::Serialize)?;
        write_file(&path, &json)?;
        Ok(path)
    }

    pub fn read(
        deployments_dir: &Path,
        network: &str,
        contract_name: &str,
    ) -> Result<Self, DeploymentRecordError> {
        let path = Self::path(deployments_dir, network, contract_name);
        if !path.is_file() {
            return Err(DeploymentRecordError::NotFound {
                contract: contract_name.to_string(),
                network: network.to_string(),
            });
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| DeploymentRecordError::CanNotRead(path.display().to_string(), e))?;
        serde_json::from_str(&json)
            .map_err(|e| DeploymentRecordError::Invalid(path.display().to_string(), e))
    }
}
