//! # Xinde Config
//!
//! Configuration for clients of the Xinde identity-verification API.
//!
//! A [`XindeConfig`] carries the service base URL, the app credentials used to
//! sign requests, and the network timeout. It can be built in code, loaded
//! from JSON or TOML files, or read from environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Base URL of the production service
pub const DEFAULT_BASE_URL: &str = "https://api.xindedata.com";

/// Connect and read timeout applied to each request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a Xinde API client
///
/// # Examples
///
/// ## Creating a configuration manually
///
/// ```
/// use xinde_config::XindeConfig;
///
/// let config = XindeConfig::new("myappid", "mySecret");
/// assert_eq!(config.base_url, "https://api.xindedata.com");
/// assert_eq!(config.timeout_secs, 30);
/// ```
///
/// ## Loading from a JSON file
///
/// ```no_run
/// use xinde_config::XindeConfig;
///
/// let config = XindeConfig::from_file("./xinde.json")
///     .expect("Failed to load configuration");
/// ```
///
/// ## Loading from environment variables
///
/// ```no_run
/// use xinde_config::XindeConfig;
///
/// // XINDE_APP_ID=myappid
/// // XINDE_APP_SECRET=mySecret
/// // XINDE_BASE_URL=https://api.xindedata.com (optional)
/// // XINDE_TIMEOUT_SECS=30 (optional)
/// let config = XindeConfig::from_env("XINDE")
///     .expect("Failed to load configuration from environment");
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XindeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub app_id: String,
    pub app_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// The secret stays out of logs.
impl fmt::Debug for XindeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XindeConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Builder for XindeConfig
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), xinde_config::ConfigError> {
/// use xinde_config::XindeConfigBuilder;
///
/// let config = XindeConfigBuilder::new()
///     .base_url("https://api.xindedata.com")
///     .app_id("myappid")
///     .app_secret("mySecret")
///     .timeout_secs(10)
///     .build()?;
///
/// // Start from an existing config and change one field
/// let staging = config.to_builder()
///     .base_url("https://staging.example.com")
///     .build()?;
/// assert_eq!(staging.app_id, "myappid");
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct XindeConfigBuilder {
    base_url: Option<String>,
    app_id: Option<String>,
    app_secret: Option<String>,
    timeout_secs: Option<u64>,
}

impl XindeConfigBuilder {
    /// Create a new XindeConfigBuilder with no fields set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new XindeConfigBuilder from an existing XindeConfig
    pub fn from_config(config: &XindeConfig) -> Self {
        Self {
            base_url: Some(config.base_url.clone()),
            app_id: Some(config.app_id.clone()),
            app_secret: Some(config.app_secret.clone()),
            timeout_secs: Some(config.timeout_secs),
        }
    }

    /// Set the base URL of the service, including the scheme
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the app id issued by Xinde
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the app secret used to sign requests
    pub fn app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    /// Set the connect and read timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Build the XindeConfig
    ///
    /// # Errors
    ///
    /// Returns an error if the app id or secret is missing, or if any field
    /// fails validation. The base URL and timeout fall back to their defaults.
    pub fn build(self) -> Result<XindeConfig, ConfigError> {
        let config = XindeConfig {
            base_url: self.base_url.unwrap_or_else(default_base_url),
            app_id: self.app_id.ok_or(ConfigError::MissingAppId)?,
            app_secret: self.app_secret.ok_or(ConfigError::MissingAppSecret)?,
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        config.validate()?;

        Ok(config)
    }
}

/// Errors that can occur when working with Xinde configuration
#[derive(Debug)]
pub enum ConfigError {
    MissingBaseUrl,
    InvalidBaseUrl(String),
    MissingAppId,
    MissingAppSecret,
    InvalidTimeout,
    IOError(String),
    ParseError(String),
    AlreadyInitialized,
    EnvVarError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBaseUrl => {
                write!(f, "Base URL is required but was empty. Please specify the URL of the Xinde service.")
            }
            ConfigError::InvalidBaseUrl(url) => {
                write!(f, "Invalid base URL '{}'. The URL must start with http:// or https://.", url)
            }
            ConfigError::MissingAppId => {
                write!(f, "App id is required but was not provided. Please provide the appid issued by Xinde.")
            }
            ConfigError::MissingAppSecret => {
                write!(f, "App secret is required but was not provided. Please provide the appSecret issued with your appid.")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "Invalid timeout. The timeout must be at least one second.")
            }
            ConfigError::IOError(e) => {
                write!(f, "I/O error occurred while reading configuration: {}. Please check file permissions and paths.", e)
            }
            ConfigError::ParseError(e) => {
                write!(f, "Failed to parse configuration data: {}. Please ensure the configuration format is correct.", e)
            }
            ConfigError::AlreadyInitialized => {
                write!(f, "Global configuration has already been initialized. Call get_default_config() to access it or create a new local configuration.")
            }
            ConfigError::EnvVarError(e) => {
                write!(f, "Environment variable error: {}. Please ensure all required environment variables are set correctly.", e)
            }
        }
    }
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

impl From<std::env::VarError> for ConfigError {
    fn from(error: std::env::VarError) -> Self {
        ConfigError::EnvVarError(error.to_string())
    }
}

impl XindeConfig {
    /// Create a configuration for the production service with default timeouts
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        XindeConfig {
            base_url: default_base_url(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn builder() -> XindeConfigBuilder {
        XindeConfigBuilder::new()
    }

    /// Convert this configuration to a builder for modification
    pub fn to_builder(&self) -> XindeConfigBuilder {
        XindeConfigBuilder::from_config(self)
    }

    /// The task endpoint, `<base_url>/v1/task`
    pub fn task_endpoint(&self) -> String {
        format!("{}/v1/task", self.base_url.trim_end_matches('/'))
    }

    /// Create a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: XindeConfig = serde_json::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from a TOML file
    #[cfg(feature = "toml")]
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: XindeConfig = toml::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from environment variables
    ///
    /// The environment variables are named with the given prefix followed by:
    /// - BASE_URL: The base URL of the service (optional)
    /// - APP_ID: The app id
    /// - APP_SECRET: The app secret
    /// - TIMEOUT_SECS: Connect and read timeout in seconds (optional)
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required variable is missing or a value is invalid.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let app_secret = env::var(format!("{}_APP_SECRET", prefix))?;
        Self::from_env_with_secret(prefix, app_secret)
    }

    /// Like [`from_env`](Self::from_env), but the secret may also be read
    /// from the file named by `<PREFIX>_APP_SECRET_FILE`, which takes
    /// precedence over `<PREFIX>_APP_SECRET`. Surrounding whitespace in the
    /// file is ignored.
    pub fn from_env_or_file(prefix: &str) -> Result<Self, ConfigError> {
        let app_secret = match env::var(format!("{}_APP_SECRET_FILE", prefix)) {
            Ok(secret_file) => fs::read_to_string(secret_file)
                .map_err(|e| ConfigError::IOError(format!("Failed to read secret file: {}", e)))?
                .trim()
                .to_string(),
            Err(std::env::VarError::NotPresent) => env::var(format!("{}_APP_SECRET", prefix))?,
            Err(e) => return Err(e.into()),
        };
        Self::from_env_with_secret(prefix, app_secret)
    }

    fn from_env_with_secret(prefix: &str, app_secret: String) -> Result<Self, ConfigError> {
        let base_url = match env::var(format!("{}_BASE_URL", prefix)) {
            Ok(url) => url,
            Err(std::env::VarError::NotPresent) => default_base_url(),
            Err(e) => return Err(e.into()),
        };

        let app_id = env::var(format!("{}_APP_ID", prefix))?;

        let timeout_secs = match env::var(format!("{}_TIMEOUT_SECS", prefix)) {
            Ok(secs) => secs
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout)?,
            Err(std::env::VarError::NotPresent) => DEFAULT_TIMEOUT_SECS,
            Err(e) => return Err(e.into()),
        };

        let config = XindeConfig {
            base_url,
            app_id,
            app_secret,
            timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        // The query string is built from the base URL, so it must not carry one itself
        if self.base_url.contains('?') {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.app_id.is_empty() {
            return Err(ConfigError::MissingAppId);
        }

        if self.app_secret.is_empty() {
            return Err(ConfigError::MissingAppSecret);
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }
}

// Global configuration singleton
static DEFAULT_CONFIG: OnceLock<XindeConfig> = OnceLock::new();

/// Set the default global configuration
///
/// Returns an error if a default configuration is already set.
pub fn set_default_config(config: XindeConfig) -> Result<(), ConfigError> {
    config.validate()?;
    DEFAULT_CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// Get the default global configuration, if set
pub fn get_default_config() -> Option<&'static XindeConfig> {
    DEFAULT_CONFIG.get()
}

fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(stripped) => dirs::home_dir().map(|home| home.join(stripped)),
        None => Some(PathBuf::from(path)),
    }
}

/// Try to load a configuration from standard locations
///
/// In order:
/// 1. Environment variables with the prefix "XINDE"
/// 2. ./xinde.json, ~/.xinde/config.json, /etc/xinde/config.json
/// 3. With the "toml" feature, the same paths with a .toml extension
///
/// Returns None if no configuration could be found.
pub fn try_load_default_config() -> Option<XindeConfig> {
    if let Ok(config) = XindeConfig::from_env_or_file("XINDE") {
        debug!("loaded configuration from XINDE_* environment");
        return Some(config);
    }

    let paths = [
        "./xinde.json",
        "~/.xinde/config.json",
        "/etc/xinde/config.json",
    ];

    for path in paths.iter().filter_map(|p| expand_home(p)) {
        if path.exists() {
            if let Ok(config) = XindeConfig::from_file(&path) {
                debug!(path = %path.display(), "loaded configuration");
                return Some(config);
            }
        }
    }

    #[cfg(feature = "toml")]
    {
        let toml_paths = [
            "./xinde.toml",
            "~/.xinde/config.toml",
            "/etc/xinde/config.toml",
        ];

        for path in toml_paths.iter().filter_map(|p| expand_home(p)) {
            if path.exists() {
                if let Ok(config) = XindeConfig::from_toml(&path) {
                    debug!(path = %path.display(), "loaded configuration");
                    return Some(config);
                }
            }
        }
    }

    None
}
