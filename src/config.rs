//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::contract::ClientConfig;
use crate::controller::ControllerConfig;
use crate::rpc::RpcConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub wallet: WalletConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network and contract configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_network_passphrase")]
    pub network_passphrase: String,

    #[serde(default = "default_contract_id")]
    pub contract_id: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_rpc_url() -> String {
    "https://soroban-testnet.stellar.org".to_string()
}

fn default_network_passphrase() -> String {
    "Test SDF Network ; September 2015".to_string()
}

fn default_contract_id() -> String {
    "CCFYHPXEHMQKWXJLJXZHUL72VB523UKUZBFYFHG6H74F24AETYO6HAA3".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            network_passphrase: default_network_passphrase(),
            contract_id: default_contract_id(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Timers for refresh, confirmation, and status reset
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    #[serde(default = "default_tx_poll_interval")]
    pub tx_poll_interval_ms: u64,

    #[serde(default = "default_tx_poll_timeout")]
    pub tx_poll_timeout_secs: u64,

    #[serde(default = "default_status_reset")]
    pub status_reset_ms: u64,
}

fn default_refresh_interval() -> u64 {
    5000 // 5 seconds
}

fn default_tx_poll_interval() -> u64 {
    2000
}

fn default_tx_poll_timeout() -> u64 {
    120
}

fn default_status_reset() -> u64 {
    5000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
            tx_poll_interval_ms: default_tx_poll_interval(),
            tx_poll_timeout_secs: default_tx_poll_timeout(),
            status_reset_ms: default_status_reset(),
        }
    }
}

/// Local signing key configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Secret seed (`S...`); without one the wallet cannot connect
    pub secret_key: Option<String>,

    /// Sign without prompting
    #[serde(default)]
    pub auto_approve: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("stellar-poll").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    ///
    /// Returns the file that was used, if any. A file that exists but cannot
    /// be loaded is an error rather than a silent fallback to defaults.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing file in `paths`, or defaults with env overrides
    pub fn load_first(paths: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => Ok((Self::load_with_env(path)?, Some(path.clone()))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Contract client settings
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            contract_id: self.network.contract_id.clone(),
            network_passphrase: self.network.network_passphrase.clone(),
            poll_interval: Duration::from_millis(self.polling.tx_poll_interval_ms),
            confirm_timeout: Duration::from_secs(self.polling.tx_poll_timeout_secs),
            ..ClientConfig::default()
        }
    }

    /// RPC transport settings
    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            url: self.network.rpc_url.clone(),
            request_timeout_ms: self.network.request_timeout_secs * 1000,
        }
    }

    /// Controller loop timing
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            refresh_interval: Duration::from_millis(self.polling.refresh_interval_ms),
            status_reset_delay: Duration::from_millis(self.polling.status_reset_ms),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Network overrides
        if let Some(url) = var("STELLAR_POLL_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Some(passphrase) = var("STELLAR_POLL_NETWORK_PASSPHRASE") {
            self.network.network_passphrase = passphrase;
        }
        if let Some(contract_id) = var("STELLAR_POLL_CONTRACT_ID") {
            self.network.contract_id = contract_id;
        }

        // Wallet overrides
        if let Some(secret) = var("STELLAR_POLL_SECRET_KEY") {
            self.wallet.secret_key = Some(secret);
        }
        if let Some(auto) = var("STELLAR_POLL_AUTO_APPROVE") {
            if let Ok(b) = auto.parse() {
                self.wallet.auto_approve = b;
            }
        }

        // Logging overrides
        if let Some(level) = var("STELLAR_POLL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("STELLAR_POLL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Stellar Poll Configuration
#
# Environment variables override these settings:
# - STELLAR_POLL_RPC_URL
# - STELLAR_POLL_NETWORK_PASSPHRASE
# - STELLAR_POLL_CONTRACT_ID
# - STELLAR_POLL_SECRET_KEY
# - STELLAR_POLL_AUTO_APPROVE
# - STELLAR_POLL_LOG_LEVEL
# - STELLAR_POLL_LOG_FORMAT

[network]
# Soroban RPC endpoint
rpc_url = "https://soroban-testnet.stellar.org"

# Network passphrase
network_passphrase = "Test SDF Network ; September 2015"

# Poll contract address
contract_id = "CCFYHPXEHMQKWXJLJXZHUL72VB523UKUZBFYFHG6H74F24AETYO6HAA3"

# RPC request timeout in seconds
request_timeout_secs = 30

[polling]
# How often to re-read the poll (ms)
refresh_interval_ms = 5000

# Delay between transaction status checks (ms)
tx_poll_interval_ms = 2000

# Give up waiting for confirmation after this many seconds
tx_poll_timeout_secs = 120

# How long the confirmation message stays up (ms)
status_reset_ms = 5000

[wallet]
# Secret seed used for signing (S...)
# secret_key = ""

# Sign without asking
auto_approve = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
