//! Chain-specific types.

use std::fmt;

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing. Displays in the `eth_chainId` hex form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A mined transaction that reached the required confirmation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(5u64);
        assert_eq!(chain_id.0, 5);
        assert_eq!(u64::from(chain_id), 5);
    }

    #[test]
    fn test_chain_id_display_matches_rpc_form() {
        assert_eq!(ChainId(5).to_string(), "0x5");
        assert_eq!(ChainId(31337).to_string(), "0x7a69");
    }

    #[test]
    fn test_default_config() {
        let config = BlockchainConfig::default();
        assert_eq!(config.chain_id, 5);
        assert_eq!(config.rpc_timeout_secs, 10);
        assert_eq!(config.confirmation_blocks, 1);
    }
}
