use std::{path::Path, time::Duration};

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use thiserror::Error;
use tracing::info;

use super::create_retry_client;
use crate::{
    network::{ChainId, NetworkId, NetworkProfile},
    signing::{load_signers, LoadSignersError},
    ProjectConfig,
};

pub type DeployProvider = DynProvider<Ethereum>;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Network {0} has no rpc endpoint")]
    NoEndpoint(String),

    #[error("{0}")]
    RetryClient(#[from] super::RetryClientError),

    #[error("Signers for network {0} could not be loaded: {1}")]
    Signers(String, LoadSignersError),

    #[error("Could not reach network {0}: {1}")]
    Rpc(String, TransportError),

    #[error("Network {name} expects chain id {expected} but the node reports {actual}")]
    ChainIdMismatch { name: String, expected: ChainId, actual: ChainId },

    #[error("Network {name} expects network id {expected} but the node reports {actual}")]
    NetworkIdMismatch { name: String, expected: NetworkId, actual: u64 },

    #[error("Network {0} has no signers, configure a signing_key or unlock accounts on the node")]
    NoSigners(String),

    #[error("Network {name} from address {from} is not one of the available signers")]
    FromNotASigner { name: String, from: Address },
}

/// Where transaction signatures come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerSource {
    /// Keys held in process, signed through the provider wallet.
    Local,
    /// Accounts unlocked on the node, signed via `eth_sendTransaction`.
    Node,
}

/// A provider bound to one network profile, with its signers resolved and
/// the node's identity verified.
#[derive(Clone)]
pub struct NetworkConnection {
    provider: DeployProvider,
    signers: Vec<Address>,
    pub signer_source: SignerSource,
    pub chain_id: ChainId,
    pub profile: NetworkProfile,
    pub poll_interval: Duration,
}

impl NetworkConnection {
    pub fn provider(&self) -> &DeployProvider {
        &self.provider
    }

    /// The signer identities available on this network, in configured order.
    pub fn get_signers(&self) -> &[Address] {
        &self.signers
    }

    pub fn signer(&self, index: usize) -> Option<Address> {
        self.signers.get(index).copied()
    }

    /// `from` of the profile when set, otherwise the first signer.
    pub fn default_sender(&self) -> Address {
        self.profile.from.unwrap_or(self.signers[0])
    }

    pub async fn balance_of(&self, address: Address) -> Result<U256, TransportError> {
        self.provider.get_balance(address).await
    }

    /// Applies sender and the profile's gas parameters to a request.
    pub fn prepare(&self, tx: TransactionRequest, from: Address) -> TransactionRequest {
        let mut tx = tx.with_from(from);

        if let Some(gas_price) = self.profile.gas_price {
            tx = tx.with_gas_price(gas_price.into_u128());
        }

        if let Some(gas) = self.profile.gas {
            tx = tx.with_gas_limit(gas);
        }

        tx
    }
}

async fn verify_identity(
    provider: &DeployProvider,
    profile: &NetworkProfile,
) -> Result<ChainId, ConnectError> {
    let chain_id = ChainId::new(
        provider.get_chain_id().await.map_err(|e| ConnectError::Rpc(profile.name.clone(), e))?,
    );

    if let Some(expected) = profile.chain_id {
        if expected != chain_id {
            return Err(ConnectError::ChainIdMismatch {
                name: profile.name.clone(),
                expected,
                actual: chain_id,
            });
        }
    }

    if let NetworkId::Id(_) = profile.network_id {
        let net_version = provider
            .get_net_version()
            .await
            .map_err(|e| ConnectError::Rpc(profile.name.clone(), e))?;

        if !profile.network_id.matches(net_version) {
            return Err(ConnectError::NetworkIdMismatch {
                name: profile.name.clone(),
                expected: profile.network_id,
                actual: net_version,
            });
        }
    }

    Ok(chain_id)
}

/// Connects to a network profile.
///
/// Local signers come from the profile's signing key (or the project-wide
/// one). Without a key the node's unlocked accounts are used.
pub async fn connect(
    project_path: &Path,
    config: &ProjectConfig,
    profile: &NetworkProfile,
) -> Result<NetworkConnection, ConnectError> {
    let rpc_url = profile.rpc_url().ok_or_else(|| ConnectError::NoEndpoint(profile.name.clone()))?;
    let client = create_retry_client(&rpc_url)?;

    let local_signers = config
        .signing_key_for(profile)
        .map(|signing_key| load_signers(project_path, signing_key))
        .transpose()
        .map_err(|e| ConnectError::Signers(profile.name.clone(), e))?;

    let (provider, signer_source, local_addresses) = match local_signers {
        Some(signers) if !signers.is_empty() => {
            let addresses = signers.iter().map(|signer| signer.address()).collect::<Vec<_>>();
            let mut wallet = EthereumWallet::from(signers[0].clone());
            for signer in signers.into_iter().skip(1) {
                wallet.register_signer(signer);
            }
            let provider = ProviderBuilder::new().wallet(wallet).connect_client(client).erased();
            (provider, SignerSource::Local, Some(addresses))
        }
        _ => (ProviderBuilder::new().connect_client(client).erased(), SignerSource::Node, None),
    };

    let chain_id = verify_identity(&provider, profile).await?;

    let signers = match local_addresses {
        Some(addresses) => addresses,
        None => provider
            .get_accounts()
            .await
            .map_err(|e| ConnectError::Rpc(profile.name.clone(), e))?,
    };

    if signers.is_empty() {
        return Err(ConnectError::NoSigners(profile.name.clone()));
    }

    if let Some(from) = profile.from {
        if !signers.contains(&from) {
            return Err(ConnectError::FromNotASigner { name: profile.name.clone(), from });
        }
    }

    info!(
        "Connected to network {} (chain id {}) with {} signer(s)",
        profile.name,
        chain_id,
        signers.len()
    );

    Ok(NetworkConnection {
        provider,
        signers,
        signer_source,
        chain_id,
        profile: profile.clone(),
        poll_interval: DEFAULT_POLL_INTERVAL,
    })
}

#[cfg(test)]
impl NetworkConnection {
    /// A connection over a mocked transport with node-managed signers and no
    /// fillers, so every queued response maps to exactly one RPC call.
    pub(crate) fn mocked(
        asserter: alloy::providers::mock::Asserter,
        signers: Vec<Address>,
        profile: NetworkProfile,
    ) -> Self {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter)
            .erased();

        Self {
            provider,
            signers,
            signer_source: SignerSource::Node,
            chain_id: ChainId::new(31337),
            profile,
            poll_interval: Duration::ZERO,
        }
    }
}
