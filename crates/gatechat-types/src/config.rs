//! Gateway configuration types.
//!
//! `GatewayConfig` represents `config.toml` in the data directory. Every
//! field has a default so a missing or partial file still yields a usable
//! configuration.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Fixed timeout of the `/health` probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of most recent messages sent as history with each request.
pub const HISTORY_WINDOW: usize = 20;

/// Maximum number of messages the persistence store keeps.
pub const STORE_CAPACITY: usize = 50;

/// Value of the `User-Agent` header on every gateway request.
pub const USER_AGENT: &str = concat!("gatechat/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the agent gateway.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL, without the `/v1/...` path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Static bearer credential. Never logged.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for non-streaming requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for a full streaming generation, in seconds.
    #[serde(default = "default_stream_timeout_secs")]
    pub stream_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:18789".to_string()
}

fn default_model() -> String {
    "default".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_stream_timeout_secs() -> u64 {
    300
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            stream_timeout_secs: default_stream_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stream_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_timeout_secs)
    }

    /// Check the invariants the transport relies on.
    ///
    /// The streaming timeout covers a whole generation, so it may not be
    /// shorter than the one-shot request timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model is empty".to_string()));
        }
        if self.request_timeout_secs == 0 || self.stream_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.stream_timeout_secs < self.request_timeout_secs {
            return Err(ConfigError::Invalid(format!(
                "stream_timeout_secs ({}) must not be shorter than request_timeout_secs ({})",
                self.stream_timeout_secs, self.request_timeout_secs
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("stream_timeout_secs", &self.stream_timeout_secs)
            .finish()
    }
}
