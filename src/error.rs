//! Error taxonomy shared by every user action.
//!
//! Each failure is terminal for the action that produced it: nothing is
//! retried automatically and the presentation layer (CLI or HTTP) decides
//! how to surface it.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::types::ChainId;
use crate::config::ConfigError;
use crate::goal::DecodeError;

/// Errors surfaced by wallet, contract and session operations.
#[derive(Debug, Error)]
pub enum GritError {
    /// No wallet provider (signing key) is available.
    #[error("Wallet not available: {0}")]
    WalletUnavailable(String),

    /// Connected to a different chain than the one the contract lives on.
    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: ChainId, actual: ChainId },

    /// Transaction was rejected by the provider or reverted on-chain.
    #[error("Transaction rejected: {0}")]
    TransactionRejected(String),

    /// Contract response could not be turned into a goal record.
    #[error("Decode error{}: {source}", token_suffix(.token_id))]
    Decode {
        token_id: Option<u64>,
        #[source]
        source: DecodeError,
    },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was broadcast but not confirmed in time.
    #[error("Transaction {tx_hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Another user action is still in flight.
    #[error("Another action is already in progress")]
    Busy,

    /// No account has been authorized yet.
    #[error("No wallet account connected")]
    NotConnected,

    /// Token id is not among the connected account's goals.
    #[error("Goal {0} not found")]
    GoalNotFound(u64),

    /// Goal already has an achievement timestamp.
    #[error("Goal {0} is already achieved")]
    AlreadyAchieved(u64),

    /// User input failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl GritError {
    /// Stable machine-readable kind, used for metrics labels and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            GritError::WalletUnavailable(_) => "wallet_unavailable",
            GritError::WrongNetwork { .. } => "wrong_network",
            GritError::TransactionRejected(_) => "transaction_rejected",
            GritError::Decode { .. } => "decode_error",
            GritError::Rpc(_) => "rpc_error",
            GritError::Timeout(_) => "timeout",
            GritError::ConfirmationTimeout { .. } => "confirmation_timeout",
            GritError::Busy => "busy",
            GritError::NotConnected => "not_connected",
            GritError::GoalNotFound(_) => "goal_not_found",
            GritError::AlreadyAchieved(_) => "already_achieved",
            GritError::InvalidRequest(_) => "invalid_request",
            GritError::Config(_) => "config_error",
        }
    }

    /// Attach the token id a decode failure belongs to.
    pub fn decode(token_id: Option<u64>, source: DecodeError) -> Self {
        GritError::Decode { token_id, source }
    }
}

fn token_suffix(token_id: &Option<u64>) -> String {
    match token_id {
        Some(id) => format!(" for token {}", id),
        None => String::new(),
    }
}

/// Result type for grit operations.
pub type GritResult<T> = Result<T, GritError>;
