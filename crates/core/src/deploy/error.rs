use alloy::primitives::TxHash;
use alloy::transports::TransportError;
use thiserror::Error;

use super::WaitError;
use crate::{
    abi::{ArgError, FindFunctionError},
    artifact::ArtifactError,
};

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Artifact(#[from] ArtifactError),

    #[error("{0}")]
    Args(#[from] ArgError),

    #[error("{0}")]
    Function(#[from] FindFunctionError),

    #[error("ABI encoding failed: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error("Dry run of {0} failed, the transaction would not succeed: {1}")]
    DryRunFailed(String, TransportError),

    #[error("Call to {0} failed: {1}")]
    CallFailed(String, TransportError),

    #[error("Sending {0} failed: {1}")]
    SendFailed(String, TransportError),

    #[error("{0}")]
    Wait(#[from] WaitError),

    #[error("Transaction {hash} for {context} was mined but reverted")]
    Reverted { context: String, hash: TxHash },

    #[error("Deployment transaction {0} has no contract address in its receipt")]
    NoContractAddress(TxHash),

    #[error("Function {0} is not payable but a value was given")]
    NotPayable(String),
}

impl ContractError {
    pub(crate) fn from_send(context: &str, error: super::SendError) -> Self {
        match error {
            super::SendError::Send(e) => ContractError::SendFailed(context.to_string(), e),
            super::SendError::Wait(e) => ContractError::Wait(e),
        }
    }
}
