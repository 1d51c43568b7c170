use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::{ChainId, GasPrice, NetworkId};
use crate::signing::SigningKey;

pub const DEFAULT_PORT: u16 = 8545;
pub const DEFAULT_TIMEOUT_BLOCKS: u64 = 50;
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// A named bundle of endpoint, identity, credentials and gas parameters.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub network_id: NetworkId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub chain_id: Option<ChainId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gas_price: Option<GasPrice>,
    /// Gas limit applied to every transaction sent on this network.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout_blocks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub skip_dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signing_key: Option<SigningKey>,
}

impl NetworkProfile {
    /// Creates a profile pointing at `url` with every optional field unset.
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: Some(url.to_string()),
            host: None,
            port: None,
            network_id: NetworkId::Any,
            chain_id: None,
            gas_price: None,
            gas: None,
            from: None,
            timeout_blocks: None,
            confirmations: None,
            skip_dry_run: false,
            signing_key: None,
        }
    }

    /// The JSON-RPC endpoint: `url` when given, otherwise `http://host:port`.
    pub fn rpc_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }

        self.host
            .as_ref()
            .map(|host| format!("http://{}:{}", host, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn timeout_blocks(&self) -> u64 {
        self.timeout_blocks.unwrap_or(DEFAULT_TIMEOUT_BLOCKS)
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations.unwrap_or(DEFAULT_CONFIRMATIONS).max(1)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Network name cannot be empty".to_string());
        }

        if self.url.is_some() && self.host.is_some() {
            return Err(format!("Network {} can not define both url and host", self.name));
        }

        match &self.url {
            Some(url) if url.trim().is_empty() => {
                return Err(format!("Network {} url is empty", self.name));
            }
            Some(_) => {}
            None => match &self.host {
                Some(host) if host.trim().is_empty() => {
                    return Err(format!("Network {} host is empty", self.name));
                }
                Some(_) => {}
                None => {
                    return Err(format!("Network {} needs either a url or a host", self.name));
                }
            },
        }

        if self.url.is_some() && self.port.is_some() {
            return Err(format!("Network {} port is only valid together with host", self.name));
        }

        if self.gas == Some(0) {
            return Err(format!("Network {} gas limit cannot be 0", self.name));
        }

        if self.timeout_blocks == Some(0) {
            return Err(format!("Network {} timeout_blocks cannot be 0", self.name));
        }

        if let Some(signing_key) = &self.signing_key {
            signing_key.validate().map_err(|e| format!("Network {}: {}", self.name, e))?;
        }

        Ok(())
    }
}
