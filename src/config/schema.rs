//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every section has defaults so a minimal (even empty) file is valid.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::config::validation::ValidationError;
use crate::goal::DEFAULT_DATE_FORMAT;

/// Address of the deployed GritNFT contract on Goerli.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xc0F43D539883532d0A5099ebBc63F2C6A4B70ecC";

/// Goerli test network.
pub const GOERLI_CHAIN_ID: u64 = 5;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GritConfig {
    /// RPC endpoints and chain expectations.
    pub blockchain: BlockchainConfig,

    /// GritNFT contract settings.
    pub contract: ContractConfig,

    /// How goals are rendered.
    pub display: DisplayConfig,

    /// HTTP API listener.
    pub http: HttpConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Analytics project identifiers.
    pub analytics: AnalyticsConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain the contract is deployed on (5 = Goerli).
    pub chain_id: u64,

    /// Refuse to send transactions when connected to another chain.
    pub enforce_chain_id: bool,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: GOERLI_CHAIN_ID,
            enforce_chain_id: true,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
        }
    }
}

/// GritNFT contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Contract address (hex).
    pub address: String,

    /// Fee paid when achieving an expired goal, in ether.
    pub achievement_fee_ether: String,

    /// Maximum time to wait for a transaction to be confirmed.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            achievement_fee_ether: "0.01".to_string(),
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2000,
        }
    }
}

impl ContractConfig {
    pub fn address(&self) -> Result<Address, ValidationError> {
        self.address.trim().parse().map_err(|e| {
            ValidationError::new(
                "contract.address",
                format!("invalid address '{}': {}", self.address, e),
            )
        })
    }

    /// Achievement fee in wei.
    pub fn achievement_fee(&self) -> Result<U256, ValidationError> {
        parse_ether(self.achievement_fee_ether.trim()).map_err(|e| {
            ValidationError::new(
                "contract.achievement_fee_ether",
                format!("invalid ether amount '{}': {}", self.achievement_fee_ether, e),
            )
        })
    }
}

/// Display configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime pattern for due dates, rendered in the local timezone.
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds. Must cover a full confirmation wait.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 360,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Analytics project identifiers, normally supplied through environment
/// variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    pub measurement_id: String,
}
