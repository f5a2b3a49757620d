//! Local signing wallet.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::error::{GritError, GritResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "GRIT_PRIVATE_KEY";

/// Wallet holding the account that owns and mints goals.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key (with or without `0x`).
    pub fn from_private_key(private_key_hex: &str) -> GritResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            GritError::WalletUnavailable(format!("Invalid private key format: {}", e))
        })?;

        tracing::info!(address = %signer.address(), "Wallet loaded");

        Ok(Self { signer })
    }

    /// Load the wallet from `GRIT_PRIVATE_KEY`.
    ///
    /// A missing variable means no wallet is installed; callers treat it as
    /// recoverable.
    pub fn from_env() -> GritResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            GritError::WalletUnavailable(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Network wallet for provider-side transaction signing.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
