//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GritConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables that override file settings.
const ENV_OVERRIDES: &[(&str, fn(&mut GritConfig, String))] = &[
    ("GRIT_RPC_URL", |c, v| c.blockchain.rpc_url = v),
    ("GRIT_CONTRACT_ADDRESS", |c, v| c.contract.address = v),
    ("GRIT_BIND_ADDRESS", |c, v| c.http.bind_address = v),
    ("GRIT_ANALYTICS_ENABLED", |c, v| match parse_flag(&v) {
        Some(enabled) => c.analytics.enabled = enabled,
        None => tracing::warn!(value = %v, "Ignoring GRIT_ANALYTICS_ENABLED: not a boolean"),
    }),
    ("GRIT_ANALYTICS_API_KEY", |c, v| c.analytics.api_key = v),
    ("GRIT_ANALYTICS_AUTH_DOMAIN", |c, v| c.analytics.auth_domain = v),
    ("GRIT_ANALYTICS_PROJECT_ID", |c, v| c.analytics.project_id = v),
    ("GRIT_ANALYTICS_STORAGE_BUCKET", |c, v| c.analytics.storage_bucket = v),
    ("GRIT_ANALYTICS_MESSAGING_SENDER_ID", |c, v| {
        c.analytics.messaging_sender_id = v
    }),
    ("GRIT_ANALYTICS_APP_ID", |c, v| c.analytics.app_id = v),
    ("GRIT_ANALYTICS_MEASUREMENT_ID", |c, v| c.analytics.measurement_id = v),
];

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply overrides using `lookup` to read variables.
pub fn apply_overrides<F>(config: &mut GritConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (name, apply) in ENV_OVERRIDES {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            tracing::debug!(variable = %name, "Applying environment override");
            apply(config, value);
        }
    }
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut GritConfig) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Parse, override from the environment, and validate a TOML string.
pub fn parse_config(content: &str) -> Result<GritConfig, ConfigError> {
    let mut config: GritConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GritConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load from `path` when given, otherwise start from defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<GritConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => parse_config(""),
    }
}
