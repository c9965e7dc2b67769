//! Configuration management module
//!
//! The staking core needs very little configuration: a single node RPC
//! endpoint plus request-shaping knobs. Values come from `AI3_`-prefixed
//! environment variables with sensible defaults, following the same
//! environment-override pattern as the rest of the portal stack.

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::core::error::StakingError;
use crate::core::result::{ResultExt, StakingResult};

/// Environment variable prefix for all settings
const ENV_PREFIX: &str = "AI3";

/// Default node RPC endpoint (public testnet gateway)
const DEFAULT_RPC_URL: &str = "https://rpc.testnet.ai3.example.net";

/// Chain access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Node RPC endpoint URL
    pub rpc_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum retries for a failed node query
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_request_timeout_ms() -> u64 {
    crate::core::domain::performance::RPC_TIMEOUT.as_millis() as u64
}

fn default_max_retries() -> u32 {
    crate::core::domain::performance::MAX_RPC_RETRIES
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl ChainConfig {
    /// Create a configuration for a specific endpoint with default knobs
    pub fn for_endpoint<S: Into<String>>(rpc_url: S) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from `AI3_*` environment variables
    ///
    /// Recognized variables: `AI3_RPC_URL`, `AI3_REQUEST_TIMEOUT_MS`,
    /// `AI3_MAX_RETRIES`. Unset variables fall back to defaults.
    pub fn from_env() -> StakingResult<Self> {
        debug!("🌍 Loading chain configuration from environment");

        let loaded = Config::builder()
            .set_default("rpc_url", DEFAULT_RPC_URL)
            .map_config_err(|| "Failed to set default rpc_url".to_string())?
            .set_default("request_timeout_ms", default_request_timeout_ms())
            .map_config_err(|| "Failed to set default request_timeout_ms".to_string())?
            .set_default("max_retries", u64::from(default_max_retries()))
            .map_config_err(|| "Failed to set default max_retries".to_string())?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true)
                    .ignore_empty(true),
            )
            .build()
            .map_config_err(|| "Failed to build configuration".to_string())?;

        let config: Self = loaded
            .try_deserialize()
            .map_config_err(|| "Invalid configuration".to_string())?;

        config.validate()?;
        info!("✅ Chain configuration loaded: endpoint={}", config.rpc_url);
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> StakingResult<()> {
        let url = Url::parse(&self.rpc_url)
            .map_err(|e| StakingError::config(format!("Invalid RPC URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(StakingError::config(format!(
                "Unsupported RPC URL scheme: {}",
                url.scheme()
            )));
        }

        if self.request_timeout_ms == 0 {
            return Err(StakingError::config(
                "Request timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Per-request timeout as a `Duration`
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}
