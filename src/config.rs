use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::validation::MaxLength;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_max_length")]
    pub default_max_length: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_summary_timeout")]
    pub summary_timeout_secs: u64,

    #[serde(default = "default_session_path")]
    pub session_path: String,

    pub log_file: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_max_length() -> u32 {
    200
}

fn default_request_timeout() -> u64 {
    30
}

fn default_summary_timeout() -> u64 {
    60
}

fn default_session_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("redbud-console");
    data_dir.join("session.json").to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_max_length: default_max_length(),
            request_timeout_secs: default_request_timeout(),
            summary_timeout_secs: default_summary_timeout(),
            session_path: default_session_path(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_base_url)
            .map_err(|e| AppError::Config(format!("api_base_url {:?}: {}", self.api_base_url, e)))?;
        MaxLength::new(self.default_max_length)
            .map_err(|e| AppError::Config(format!("default_max_length: {}", e)))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("redbud-console")
            .join("config.toml")
    }

    pub fn max_length(&self) -> MaxLength {
        MaxLength::clamped(self.default_max_length)
    }
}
