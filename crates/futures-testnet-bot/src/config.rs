/*
[INPUT]:  Defaults, optional YAML file, environment (.env included), CLI overrides
[OUTPUT]: Resolved bot configuration, adapter credentials and client config
[POS]:    Configuration layer - shared by CLI and dashboard
[UPDATE]: When adding new configuration options or environment variables
*/

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures_testnet_adapter::http::{DEFAULT_RECV_WINDOW, TESTNET_BASE_URL};
use futures_testnet_adapter::{ClientConfig, Credentials};
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";
pub const LOG_FILE_ENV: &str = "BOT_LOG_FILE";

pub const DEFAULT_LOG_FILE: &str = "bot.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Top-level configuration for the order bot
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    /// REST base URL, testnet unless overridden
    pub base_url: String,
    /// recvWindow sent with every signed request (ms)
    pub recv_window: u64,
    /// Total request timeout (seconds)
    pub timeout_secs: u64,
    pub log_file: PathBuf,
    /// `EnvFilter` directive, e.g. "debug" or "info,futures_testnet_adapter=debug"
    pub log_level: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            base_url: TESTNET_BASE_URL.to_string(),
            recv_window: DEFAULT_RECV_WINDOW,
            timeout_secs: 10,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_key: None,
            api_secret: None,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("base_url", &self.base_url)
            .field("recv_window", &self.recv_window)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_file", &self.log_file)
            .field("log_level", &self.log_level)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl BotConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Defaults or the given file, then the process environment on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay environment values; blank values are ignored
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = read(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(secret) = read(API_SECRET_ENV) {
            self.api_secret = Some(secret);
        }
        if let Some(path) = read(LOG_FILE_ENV) {
            self.log_file = PathBuf::from(path);
        }
    }

    /// Credentials for a live client, or an error naming what is missing
    pub fn credentials(&self) -> Result<Credentials> {
        let key = self.api_key.as_deref().filter(|value| !value.is_empty());
        let secret = self.api_secret.as_deref().filter(|value| !value.is_empty());
        match (key, secret) {
            (Some(key), Some(secret)) => Ok(Credentials::new(key, secret)),
            _ => bail!(
                "missing API credentials: set {API_KEY_ENV} and {API_SECRET_ENV} or pass --api-key/--api-secret"
            ),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            recv_window: self.recv_window,
            ..ClientConfig::default()
        }
    }
}
