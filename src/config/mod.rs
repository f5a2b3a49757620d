//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply GRIT_* env overrides)
//!     → validation.rs (semantic checks)
//!     → GritConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Secrets (private key, analytics keys) come from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AnalyticsConfig, BlockchainConfig, ContractConfig, DisplayConfig, GritConfig, HttpConfig,
    ObservabilityConfig,
};
pub use validation::{validate_config, ValidationError};
