//! GritNFT contract binding.
//!
//! Only the four ABI functions the client needs are bound. Mutating calls
//! return the transaction hash as soon as the provider accepts it; the
//! caller must wait for confirmation before treating the action as done.

use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::ConfirmationWatcher;
use crate::blockchain::types::Confirmation;
use crate::blockchain::wallet::Wallet;
use crate::config::{ConfigError, ContractConfig};
use crate::error::{GritError, GritResult};
use crate::goal::{RawGoalMetadata, WideInt};

sol! {
    #[sol(rpc)]
    contract GritNFT {
        struct Metadata {
            string name;
            string description;
            string imageSVG;
            uint256 createdAt;
            uint256 dueDate;
            uint256 achievedAt;
        }

        function makeNFT(string memory name, string memory description, uint256 dueDate) external;
        function getTokenIds(address owner) external view returns (uint256[] memory);
        function getMetadatas(uint256[] memory tokenIds) external view returns (Metadata[] memory);
        function updateNFTOf(uint256 tokenId) external payable;
    }
}

impl From<GritNFT::Metadata> for RawGoalMetadata {
    fn from(m: GritNFT::Metadata) -> Self {
        Self {
            name: Some(m.name),
            description: Some(m.description),
            image_svg: Some(m.imageSVG),
            created_at: Some(WideInt::from(m.createdAt)),
            due_date: Some(WideInt::from(m.dueDate)),
            achieved_at: Some(WideInt::from(m.achievedAt)),
        }
    }
}

/// Operations the client performs against the goal contract.
#[async_trait]
pub trait GoalContract: Send + Sync {
    /// `makeNFT(name, description, dueDate)`.
    async fn make_nft(&self, name: &str, description: &str, due_date: u64) -> GritResult<TxHash>;

    /// `getTokenIds(owner)`.
    async fn get_token_ids(&self, owner: Address) -> GritResult<Vec<U256>>;

    /// `getMetadatas(tokenIds)`, one entry per id, in order.
    async fn get_metadatas(&self, token_ids: &[U256]) -> GritResult<Vec<RawGoalMetadata>>;

    /// `updateNFTOf(tokenId)`, optionally paying `fee` wei.
    async fn update_nft_of(&self, token_id: u64, fee: Option<U256>) -> GritResult<TxHash>;

    /// Block until a transaction returned above is final.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> GritResult<Confirmation>;
}

/// GritNFT over alloy, signing with the local wallet when one is loaded.
pub struct GritNftContract {
    instance: GritNFT::GritNFTInstance<DynProvider>,
    watcher: ConfirmationWatcher,
    call_timeout: Duration,
}

impl GritNftContract {
    /// Bind the contract at `config.address`.
    ///
    /// Without a wallet the binding can still read; sends are rejected by
    /// the provider.
    pub fn connect(
        client: &BlockchainClient,
        config: &ContractConfig,
        wallet: Option<&Wallet>,
    ) -> GritResult<Self> {
        let address = config
            .address()
            .map_err(|e| GritError::Config(ConfigError::Validation(vec![e])))?;
        let url: url::Url = client.rpc_url().parse().map_err(|e| {
            GritError::Rpc(format!("Invalid RPC URL '{}': {}", client.rpc_url(), e))
        })?;

        let provider = match wallet {
            Some(wallet) => ProviderBuilder::new()
                .wallet(wallet.ethereum_wallet())
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        tracing::info!(contract = %address, signer = wallet.is_some(), "GritNFT contract bound");

        Ok(Self {
            instance: GritNFT::new(address, provider),
            watcher: ConfirmationWatcher::new(client.clone(), config),
            call_timeout: client.timeout_duration(),
        })
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn bounded<T, F>(&self, fut: F) -> GritResult<T>
    where
        F: Future<Output = GritResult<T>>,
    {
        timeout(self.call_timeout, fut)
            .await
            .map_err(|_| GritError::Timeout(self.call_timeout.as_secs()))?
    }
}

#[async_trait]
impl GoalContract for GritNftContract {
    async fn make_nft(&self, name: &str, description: &str, due_date: u64) -> GritResult<TxHash> {
        let call = self.instance.makeNFT(
            name.to_string(),
            description.to_string(),
            U256::from(due_date),
        );
        self.bounded(async {
            let pending = call
                .send()
                .await
                .map_err(|e| GritError::TransactionRejected(e.to_string()))?;
            Ok(*pending.tx_hash())
        })
        .await
    }

    async fn get_token_ids(&self, owner: Address) -> GritResult<Vec<U256>> {
        let call = self.instance.getTokenIds(owner);
        self.bounded(async { call.call().await.map_err(|e| GritError::Rpc(e.to_string())) })
            .await
    }

    async fn get_metadatas(&self, token_ids: &[U256]) -> GritResult<Vec<RawGoalMetadata>> {
        let call = self.instance.getMetadatas(token_ids.to_vec());
        let metadatas = self
            .bounded(async { call.call().await.map_err(|e| GritError::Rpc(e.to_string())) })
            .await?;
        Ok(metadatas.into_iter().map(RawGoalMetadata::from).collect())
    }

    async fn update_nft_of(&self, token_id: u64, fee: Option<U256>) -> GritResult<TxHash> {
        let mut call = self.instance.updateNFTOf(U256::from(token_id));
        if let Some(fee) = fee {
            call = call.value(fee);
        }
        self.bounded(async {
            let pending = call
                .send()
                .await
                .map_err(|e| GritError::TransactionRejected(e.to_string()))?;
            Ok(*pending.tx_hash())
        })
        .await
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> GritResult<Confirmation> {
        self.watcher.wait(tx_hash).await
    }
}
