use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// EIP-155 chain identifier as reported by `eth_chainId`.
#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct ChainId(u64);

impl ChainId {
    pub fn new(id: u64) -> Self {
        ChainId(id)
    }

    pub fn u64(&self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;

        Ok(ChainId(id))
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid chain id")]
pub struct ParseChainIdError;

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(param: &str) -> Result<Self, Self::Err> {
        u64::from_str(param).map(ChainId).map_err(|_| ParseChainIdError)
    }
}

impl From<ChainId> for u64 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.0
    }
}

impl From<u64> for ChainId {
    fn from(chain_id: u64) -> Self {
        ChainId(chain_id)
    }
}
