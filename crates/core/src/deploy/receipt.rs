use std::time::Duration;

use alloy::{
    network::ReceiptResponse,
    primitives::{Address, TxHash},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    transports::TransportError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::provider::{DeployProvider, NetworkConnection};

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("Transaction {hash} was not mined within {blocks} blocks")]
    Timeout { hash: TxHash, blocks: u64 },

    #[error("Polling for transaction {0} failed: {1}")]
    Rpc(TxHash, TransportError),
}

/// The parts of a receipt worth reporting.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub from: Address,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub status: bool,
    pub logs: usize,
}

impl From<&TransactionReceipt> for ReceiptSummary {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            from: receipt.from,
            to: receipt.to,
            contract_address: receipt.contract_address,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            status: receipt.status(),
            logs: receipt.inner.logs().len(),
        }
    }
}

/// Polls until `tx_hash` has a receipt with `confirmations` confirmations.
///
/// Gives up once `timeout_blocks` blocks have been produced since polling
/// started without the transaction being mined.
pub async fn wait_for_receipt<P: Provider>(
    provider: &P,
    tx_hash: TxHash,
    timeout_blocks: u64,
    confirmations: u64,
    poll_interval: Duration,
) -> Result<TransactionReceipt, WaitError> {
    let rpc_error = |e| WaitError::Rpc(tx_hash, e);
    let start_block = provider.get_block_number().await.map_err(rpc_error)?;

    loop {
        let receipt = provider.get_transaction_receipt(tx_hash).await.map_err(rpc_error)?;
        let current_block = provider.get_block_number().await.map_err(rpc_error)?;

        match receipt {
            Some(receipt) => {
                let mined_in = receipt.block_number.unwrap_or(current_block);
                let confirmed = current_block.saturating_sub(mined_in) + 1;
                if confirmed >= confirmations {
                    return Ok(receipt);
                }
                debug!(
                    "Transaction {} has {}/{} confirmations",
                    tx_hash, confirmed, confirmations
                );
            }
            None => {
                if current_block.saturating_sub(start_block) >= timeout_blocks {
                    return Err(WaitError::Timeout { hash: tx_hash, blocks: timeout_blocks });
                }
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Broadcasts a prepared request on the connection and waits for its receipt
/// using the profile's `timeout_blocks` and `confirmations`.
pub async fn send_and_wait(
    connection: &NetworkConnection,
    tx: TransactionRequest,
) -> Result<TransactionReceipt, SendError> {
    let provider: &DeployProvider = connection.provider();
    let pending = provider.send_transaction(tx).await.map_err(SendError::Send)?;
    let tx_hash = *pending.tx_hash();
    info!("Sent transaction {} on {}", tx_hash, connection.profile.name);

    let receipt = wait_for_receipt(
        provider,
        tx_hash,
        connection.profile.timeout_blocks(),
        connection.profile.confirmations(),
        connection.poll_interval,
    )
    .await
    .map_err(SendError::Wait)?;

    info!(
        "Transaction {} mined in block {:?} (gas used {})",
        tx_hash, receipt.block_number, receipt.gas_used
    );

    Ok(receipt)
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("{0}")]
    Send(TransportError),

    #[error("{0}")]
    Wait(WaitError),
}
