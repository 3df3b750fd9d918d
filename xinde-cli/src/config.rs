use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xinde_config::{XindeConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Keys accepted by `config set` and `config get`
pub const CONFIG_KEYS: [&str; 2] = ["base_url", "timeout_secs"];

/// Settings stored in ~/.xinde/config.toml
///
/// Credentials are not stored here; they are passed on the command line.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Base URL of the service
    pub base_url: Option<String>,
    /// Connect and read timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl CliConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("Failed to parse config: {e}")))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// The values written by `config init`
    pub fn with_defaults() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".xinde"))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Set a value by key name, validating it
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(CliError::InvalidInput(format!(
                        "Base URL must start with http:// or https://: {value}"
                    )));
                }
                self.base_url = Some(value.trim_end_matches('/').to_string());
            }
            "timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        CliError::InvalidInput("Timeout must be a positive number of seconds".into())
                    })?;
                self.timeout_secs = Some(secs);
            }
            _ => {
                return Err(CliError::InvalidInput(format!(
                    "Unknown configuration key: {key}"
                )));
            }
        }
        Ok(())
    }

    /// Get a value by key name, `None` if the key is valid but unset
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "base_url" => Ok(self.base_url.clone()),
            "timeout_secs" => Ok(self.timeout_secs.map(|s| s.to_string())),
            _ => Err(CliError::InvalidInput(format!(
                "Unknown configuration key: {key}"
            ))),
        }
    }

    /// Build a client configuration for the given credentials.
    ///
    /// A base URL given on the command line wins over the config file.
    pub fn client_config(
        &self,
        base_url: Option<String>,
        app_id: &str,
        app_secret: &str,
    ) -> Result<XindeConfig> {
        let mut builder = XindeConfig::builder().app_id(app_id).app_secret(app_secret);

        if let Some(url) = base_url.or_else(|| self.base_url.clone()) {
            builder = builder.base_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout_secs(secs);
        }

        Ok(builder.build()?)
    }
}
