//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Validation is a pure
//! function that reports every problem, not just the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GritConfig;
use crate::goal::record::is_valid_date_format;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GritConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.blockchain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL '{}': {}", config.blockchain.rpc_url, e),
        ));
    }
    for failover in &config.blockchain.failover_urls {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("invalid URL '{}': {}", failover, e),
            ));
        }
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }

    if let Err(e) = config.contract.address() {
        errors.push(e);
    }
    if let Err(e) = config.contract.achievement_fee() {
        errors.push(e);
    }
    if config.contract.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "contract.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.contract.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "contract.poll_interval_ms",
            "must be greater than 0",
        ));
    }

    if !is_valid_date_format(&config.display.date_format) {
        errors.push(ValidationError::new(
            "display.date_format",
            format!("invalid strftime pattern '{}'", config.display.date_format),
        ));
    }

    if let Err(e) = config.http.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::new(
            "http.bind_address",
            format!("invalid socket address '{}': {}", config.http.bind_address, e),
        ));
    }
    if config.http.request_timeout_secs <= config.contract.confirmation_timeout_secs {
        errors.push(ValidationError::new(
            "http.request_timeout_secs",
            format!(
                "must exceed contract.confirmation_timeout_secs ({})",
                config.contract.confirmation_timeout_secs
            ),
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!(
                    "invalid socket address '{}': {}",
                    config.observability.metrics_address, e
                ),
            ));
        }
    }

    if config.analytics.enabled {
        if config.analytics.project_id.is_empty() {
            errors.push(ValidationError::new(
                "analytics.project_id",
                "required when analytics is enabled",
            ));
        }
        if config.analytics.app_id.is_empty() {
            errors.push(ValidationError::new(
                "analytics.app_id",
                "required when analytics is enabled",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
