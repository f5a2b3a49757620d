//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, RPC URL)
//!     → wallet.rs (key loading)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → provider.rs (eth_accounts / eth_requestAccounts / eth_chainId)
//!     → contract.rs (GritNFT ABI: makeNFT, getTokenIds, getMetadatas, updateNFTOf)
//!     → transaction.rs (wait for confirmations)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod provider;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::{GoalContract, GritNftContract};
pub use provider::{LocalWalletProvider, WalletProvider};
pub use transaction::ConfirmationWatcher;
pub use types::{BlockchainConfig, ChainId, Confirmation};
pub use wallet::Wallet;
