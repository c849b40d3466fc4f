//! Gateway configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.gatechat/` in production)
//! into [`GatewayConfig`], then applies `GATECHAT_*` environment overrides.
//! A missing or malformed file falls back to defaults.

use std::path::Path;

use gatechat_types::config::GatewayConfig;
use gatechat_types::error::ConfigError;

use crate::filesystem::config_path;

pub const BASE_URL_ENV: &str = "GATECHAT_BASE_URL";
pub const API_TOKEN_ENV: &str = "GATECHAT_API_TOKEN";
pub const MODEL_ENV: &str = "GATECHAT_MODEL";
pub const REQUEST_TIMEOUT_ENV: &str = "GATECHAT_REQUEST_TIMEOUT_SECS";
pub const STREAM_TIMEOUT_ENV: &str = "GATECHAT_STREAM_TIMEOUT_SECS";

/// Load gateway configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GatewayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_gateway_config(data_dir: &Path) -> GatewayConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GatewayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GatewayConfig::default();
        }
    };

    match toml::from_str::<GatewayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GatewayConfig::default()
        }
    }
}

/// Apply `GATECHAT_*` overrides read through `lookup`.
///
/// Empty values are ignored. A timeout that is not a whole number of
/// seconds is an error rather than silently ignored.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(base_url) = get(BASE_URL_ENV) {
        config.base_url = base_url;
    }
    if let Some(token) = get(API_TOKEN_ENV) {
        config.api_token = Some(token);
    }
    if let Some(model) = get(MODEL_ENV) {
        config.model = model;
    }
    if let Some(secs) = get(REQUEST_TIMEOUT_ENV) {
        config.request_timeout_secs = parse_secs(REQUEST_TIMEOUT_ENV, &secs)?;
    }
    if let Some(secs) = get(STREAM_TIMEOUT_ENV) {
        config.stream_timeout_secs = parse_secs(STREAM_TIMEOUT_ENV, &secs)?;
    }

    Ok(config)
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} must be a number of seconds, got '{value}'")))
}

/// The configuration the client runs with: file, then environment, then
/// validation.
pub async fn load_effective_config(data_dir: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = load_gateway_config(data_dir).await;
    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    tracing::debug!(config = ?config, "effective gateway config");
    Ok(config)
}
