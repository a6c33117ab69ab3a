use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub auction: AuctionApiConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct AuctionApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    pub url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_index_name")]
    pub index: String,
}

#[derive(Debug, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_retry_interval_seconds")]
    pub retry_interval_seconds: u64,
    /// 0 retries forever
    #[serde(default)]
    pub max_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            retry_interval_seconds: default_retry_interval_seconds(),
            max_attempts: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub path: String,
    /// Maximum size of a single log file in megabytes
    pub size: u64,
    pub max_files: usize,
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_index_name() -> String {
    "auctions".to_string()
}

fn default_retry_interval_seconds() -> u64 {
    3
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))?;
    let config: Config = toml::from_str(&config_text)?;
    Ok(config)
}
