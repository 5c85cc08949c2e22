//! Configuration Module
//!
//! YAML configuration loading with environment variable interpolation and
//! validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_maker::infrastructure::config::load_config;
//!
//! // Load from default path (market-maker.yaml)
//! let config = load_config(None)?;
//! println!("update mode: {}", config.model_state.update_mode);
//! ```

mod settings;

use std::sync::OnceLock;

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use thiserror::Error;

pub use settings::{CoreConfig, HealthSettings, ModelStateSettings};

use crate::application::order_chain::{ChainConfigError, OrderChain};
use crate::application::reconciler::{ReconcilerSettings, Tolerance};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// The order chain could not be built.
    #[error("Invalid order chain: {0}")]
    ChainError(#[from] ChainConfigError),
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "market-maker.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<CoreConfig, ConfigError> {
    let path = path.unwrap_or("market-maker.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<CoreConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: CoreConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty strings.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(value) if !value.is_empty() => value,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &CoreConfig) -> Result<(), ConfigError> {
    let model = &config.model_state;
    if model.fetch_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "model_state.fetch_timeout_ms must be positive".to_string(),
        ));
    }
    if model.subscribe_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "model_state.subscribe_timeout_ms must be positive".to_string(),
        ));
    }

    if config.health.port == 0 {
        return Err(ConfigError::ValidationError(
            "health.port must be non-zero".to_string(),
        ));
    }

    if let ReconcilerSettings::Tolerance {
        price_tolerance,
        quantity_tolerance,
    } = config.reconciler
    {
        for (name, tolerance) in [
            ("price_tolerance", price_tolerance),
            ("quantity_tolerance", quantity_tolerance),
        ] {
            let value = match tolerance {
                Tolerance::Absolute(value) | Tolerance::Relative(value) => value,
            };
            if value < Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "reconciler.{name} must not be negative"
                )));
            }
        }
    }

    OrderChain::from_config(&config.order_chain)?;
    Ok(())
}
