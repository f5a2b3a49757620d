//! Wallet provider boundary: the account and network the user is on.
//!
//! Mirrors the three wallet RPC methods the client relies on:
//! `eth_accounts`, `eth_requestAccounts` and `eth_chainId`.

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::ChainId;
use crate::blockchain::wallet::Wallet;
use crate::error::{GritError, GritResult};

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized (`eth_accounts`).
    ///
    /// Fails with `WalletUnavailable` when no wallet is installed.
    async fn accounts(&self) -> GritResult<Vec<Address>>;

    /// Ask the wallet to authorize an account (`eth_requestAccounts`).
    async fn request_accounts(&self) -> GritResult<Vec<Address>>;

    /// Chain the wallet is connected to (`eth_chainId`).
    async fn chain_id(&self) -> GritResult<ChainId>;
}

/// Provider backed by the env-loaded wallet and the RPC client.
///
/// A loaded key is treated as an already authorized account.
#[derive(Debug, Clone)]
pub struct LocalWalletProvider {
    wallet: Option<Wallet>,
    client: BlockchainClient,
}

impl LocalWalletProvider {
    pub fn new(wallet: Option<Wallet>, client: BlockchainClient) -> Self {
        Self { wallet, client }
    }

    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    fn require_wallet(&self) -> GritResult<&Wallet> {
        self.wallet.as_ref().ok_or_else(|| {
            GritError::WalletUnavailable(format!(
                "set {} to a private key to connect a wallet",
                crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR
            ))
        })
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    async fn accounts(&self) -> GritResult<Vec<Address>> {
        Ok(vec![self.require_wallet()?.address()])
    }

    async fn request_accounts(&self) -> GritResult<Vec<Address>> {
        let address = self.require_wallet()?.address();
        tracing::info!(account = %address, "Wallet account authorized");
        Ok(vec![address])
    }

    async fn chain_id(&self) -> GritResult<ChainId> {
        self.client.get_chain_id().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainConfig;

    async fn offline_client() -> BlockchainClient {
        BlockchainClient::new(BlockchainConfig {
            rpc_url: "http://127.0.0.1:9".into(),
            rpc_timeout_secs: 1,
            ..BlockchainConfig::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_wallet_is_unavailable() {
        let provider = LocalWalletProvider::new(None, offline_client().await);
        assert!(matches!(
            provider.accounts().await,
            Err(GritError::WalletUnavailable(_))
        ));
        assert!(matches!(
            provider.request_accounts().await,
            Err(GritError::WalletUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_loaded_wallet_is_authorized() {
        let wallet = Wallet::from_private_key(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let address = wallet.address();
        let provider = LocalWalletProvider::new(Some(wallet), offline_client().await);
        assert_eq!(provider.accounts().await.unwrap(), vec![address]);
        assert_eq!(provider.request_accounts().await.unwrap(), vec![address]);
    }
}
