//! Configuration loading
//!
//! Every setting resolves in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ADAPTER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SENTIMENT_URL: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/google/mobilenet_v2_1.0_224";

pub const ENV_HOST: &str = "SENTISHOP_HOST";
pub const ENV_PORT: &str = "SENTISHOP_PORT";
pub const ENV_UPLOAD_DIR: &str = "SENTISHOP_UPLOAD_DIR";
pub const ENV_SEED: &str = "SENTISHOP_SEED";
pub const ENV_LOG_LEVEL: &str = "SENTISHOP_LOG_LEVEL";
pub const ENV_API_KEY: &str = "HUGGING_FACE_API_KEY";
pub const ENV_SENTIMENT_URL: &str = "SENTISHOP_SENTIMENT_URL";
pub const ENV_CLASSIFIER_URL: &str = "SENTISHOP_CLASSIFIER_URL";
pub const ENV_ADAPTER_TIMEOUT: &str = "SENTISHOP_ADAPTER_TIMEOUT_SECS";

/// Settings read from the optional TOML file
///
/// All keys are optional; a missing key falls through to the compiled default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub hugging_face_api_key: Option<String>,
    pub sentiment_url: Option<String>,
    pub classifier_url: Option<String>,
    pub adapter_timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load the explicit file if given, else the per-user default if present
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub seed_file: Option<PathBuf>,
    pub log_level: String,
    pub hugging_face_api_key: String,
    pub sentiment_url: String,
    pub classifier_url: String,
    pub adapter_timeout_secs: u64,
}

impl Config {
    /// Merge CLI, environment, TOML and compiled defaults
    pub fn resolve(cli: CliOverrides, file: TomlConfig) -> Result<Self> {
        let port = match cli.port {
            Some(port) => port,
            None => match env_value(ENV_PORT) {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, raw)))?,
                None => file.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let adapter_timeout_secs = match env_value(ENV_ADAPTER_TIMEOUT) {
            Some(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("{} must be a number of seconds: {}", ENV_ADAPTER_TIMEOUT, raw))
            })?,
            None => file.adapter_timeout_secs.unwrap_or(DEFAULT_ADAPTER_TIMEOUT_SECS),
        };
        if adapter_timeout_secs == 0 {
            return Err(Error::Config("adapter timeout must be at least 1 second".to_string()));
        }

        let hugging_face_api_key = env_value(ENV_API_KEY)
            .or(file.hugging_face_api_key)
            .unwrap_or_default();

        Ok(Self {
            host: pick(cli.host, ENV_HOST, file.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            upload_dir: pick(cli.upload_dir, ENV_UPLOAD_DIR, file.upload_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            seed_file: pick(cli.seed_file, ENV_SEED, file.seed_file),
            log_level: pick(cli.log_level, ENV_LOG_LEVEL, file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            hugging_face_api_key,
            sentiment_url: env_value(ENV_SENTIMENT_URL)
                .or(file.sentiment_url)
                .unwrap_or_else(|| DEFAULT_SENTIMENT_URL.to_string()),
            classifier_url: env_value(ENV_CLASSIFIER_URL)
                .or(file.classifier_url)
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string()),
            adapter_timeout_secs,
        })
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn adapter_timeout(&self) -> Duration {
        crate::time::secs_to_duration(self.adapter_timeout_secs)
    }
}

/// Per-user config file location (`<config_dir>/sentishop/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sentishop").join("config.toml"))
}

/// Load `KEY=value` pairs from a dotenv file into the process environment
///
/// Variables that are already set keep their value. Without an explicit
/// path, `.env` is looked up from the working directory upward. A missing
/// file is not an error; returns the path that was loaded.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(Error::Config(format!("Cannot load env file: {}", e))),
    }
}

fn pick<T: From<String>>(cli: Option<T>, env_name: &str, file: Option<T>) -> Option<T> {
    cli.or_else(|| env_value(env_name).map(T::from)).or(file)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
