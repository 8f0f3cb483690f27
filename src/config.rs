use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_CARDS, FailurePolicy};
use crate::error::SyncError;

pub const DEFAULT_CONFIG_FILE: &str = "mtg-sync.json";
pub const DEFAULT_BULK_DATA_URL: &str = "https://api.scryfall.com/bulk-data";
pub const DEFAULT_IMAGES_DIR: &str = "magic-the-gathering-cards";
pub const DEFAULT_INTERVAL_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// On-disk config. Every field is optional; missing values fall back to defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub images_dir: Option<String>,
    #[serde(default)]
    pub bulk_data_url: Option<String>,
    #[serde(default)]
    pub dataset_type: Option<String>,
    #[serde(default)]
    pub request_interval_ms: Option<u64>,
    #[serde(default)]
    pub failure_policy: Option<FailurePolicy>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub data_dir: Utf8PathBuf,
    pub images_dir_name: String,
    pub bulk_data_url: String,
    pub dataset_type: String,
    pub request_interval: Duration,
    pub failure_policy: FailurePolicy,
    pub timeout: Duration,
}

impl SyncConfig {
    pub fn with_data_dir(data_dir: Utf8PathBuf) -> Self {
        Self {
            data_dir,
            images_dir_name: DEFAULT_IMAGES_DIR.to_string(),
            bulk_data_url: DEFAULT_BULK_DATA_URL.to_string(),
            dataset_type: DEFAULT_CARDS.to_string(),
            request_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            failure_policy: FailurePolicy::Continue,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<Utf8PathBuf>,
    pub request_interval_ms: Option<u64>,
    pub failure_policy: Option<FailurePolicy>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<SyncConfig, SyncError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content =
                fs::read_to_string(&config_path).map_err(|err| SyncError::ConfigRead {
                    path: config_path.clone(),
                    message: err.to_string(),
                })?;
            serde_json::from_str(&content).map_err(|err| SyncError::ConfigParse {
                path: config_path.clone(),
                message: err.to_string(),
            })?
        };

        let default_data_dir = default_data_dir()?;
        Ok(Self::resolve_config(config, overrides, default_data_dir))
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
        default_data_dir: Utf8PathBuf,
    ) -> SyncConfig {
        let mut resolved = SyncConfig::with_data_dir(default_data_dir);

        if let Some(dir) = overrides.data_dir.or(config.data_dir.map(Utf8PathBuf::from)) {
            resolved.data_dir = dir;
        }
        if let Some(name) = config.images_dir {
            resolved.images_dir_name = name;
        }
        if let Some(url) = config.bulk_data_url {
            resolved.bulk_data_url = url;
        }
        if let Some(kind) = config.dataset_type {
            resolved.dataset_type = kind;
        }
        if let Some(ms) = overrides.request_interval_ms.or(config.request_interval_ms) {
            resolved.request_interval = Duration::from_millis(ms);
        }
        if let Some(policy) = overrides.failure_policy.or(config.failure_policy) {
            resolved.failure_policy = policy;
        }
        if let Some(secs) = config.timeout_secs {
            resolved.timeout = Duration::from_secs(secs);
        }

        resolved
    }
}

pub fn default_data_dir() -> Result<Utf8PathBuf, SyncError> {
    let cwd = std::env::current_dir().map_err(|err| SyncError::Filesystem(err.to_string()))?;
    Utf8PathBuf::from_path_buf(cwd.join("data"))
        .map_err(|_| SyncError::Filesystem("invalid data directory path".to_string()))
}
