//! Blockchain RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to the primary JSON-RPC endpoint plus failovers
//! - Query chain state (chain id, block number, receipts)
//! - Bound every call with the configured timeout
//! - Provide a health check for blockchain connectivity

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, ChainId};
use crate::error::{GritError, GritResult};
use crate::observability::metrics;

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Primary provider first, then failovers.
    providers: Vec<SharedProvider>,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Succeeds even when the endpoint is unreachable; a chain id mismatch
    /// is logged, not fatal.
    pub async fn new(config: BlockchainConfig) -> GritResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            GritError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as SharedProvider);

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => providers
                    .push(Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => tracing::info!(
                rpc_url = %config.rpc_url,
                chain_id = %ChainId(config.chain_id),
                "Blockchain client initialized"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "Blockchain client initialized but chain verification failed"
            ),
        }

        Ok(client)
    }

    /// Run `call` against each provider in order until one answers in time.
    async fn with_failover<T, E, F, Fut>(&self, operation: &'static str, call: F) -> GritResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, operation, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, operation, "RPC timeout, trying next provider");
                }
            }
        }
        Err(GritError::Rpc(format!("All RPC providers failed to {}", operation)))
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> GritResult<()> {
        let actual = self.get_chain_id().await?;
        let expected = ChainId(self.config.chain_id);
        if actual != expected {
            return Err(GritError::WrongNetwork { expected, actual });
        }
        Ok(())
    }

    pub async fn get_chain_id(&self) -> GritResult<ChainId> {
        self.with_failover("get chain id", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    pub async fn get_block_number(&self) -> GritResult<u64> {
        self.with_failover("get block number", |p| async move {
            p.get_block_number().await
        })
        .await
    }

    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> GritResult<Option<TransactionReceipt>> {
        self.with_failover("get receipt", move |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// Check if the blockchain is reachable.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    pub fn rpc_url(&self) -> &str {
        &self.config.rpc_url
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }

    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
