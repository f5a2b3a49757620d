//! Transaction confirmation monitoring.
//!
//! A mutating contract call only returns a transaction hash; the action is
//! not complete until the receipt is mined and buried under the configured
//! number of blocks.

use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::Confirmation;
use crate::config::ContractConfig;
use crate::error::{GritError, GritResult};

/// Polls receipts until a transaction is final, reverted, or timed out.
#[derive(Debug, Clone)]
pub struct ConfirmationWatcher {
    client: BlockchainClient,
    timeout: Duration,
    poll_interval: Duration,
}

impl ConfirmationWatcher {
    pub fn new(client: BlockchainClient, config: &ContractConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Wait for `tx_hash` to reach the required confirmation depth.
    pub async fn wait(&self, tx_hash: TxHash) -> GritResult<Confirmation> {
        let required = u64::from(self.client.confirmation_blocks());

        let result = timeout(self.timeout, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                // The transaction is already broadcast; RPC errors only delay the
                // answer until the deadline.
                let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed, polling again");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(GritError::TransactionRejected(format!(
                        "transaction {} reverted",
                        tx_hash
                    )));
                }

                let current_block = match self.client.get_block_number().await {
                    Ok(block) => block,
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Block number lookup failed, polling again");
                        continue;
                    }
                };
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block itself counts as the first confirmation.
                let confirmations = current_block.saturating_sub(tx_block) + 1;

                if confirmations >= required {
                    return Ok(Confirmation {
                        tx_hash,
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations,
                    required,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(GritError::ConfirmationTimeout {
                tx_hash,
                secs: self.timeout.as_secs(),
            }),
        }
    }
}
