//! # Xinde SDK
//!
//! A Rust client library for the Xinde identity-verification API.
//!
//! This crate combines functionality from:
//! - `xinde-sign`: Request signing
//! - `xinde-config`: Configuration management
//! - `xinde-api`: Blocking HTTP client for the task endpoints
//!
//! ## Signing a URL
//!
//! Every request carries a `signature` parameter: the SHA-1 of the app secret,
//! the query parameters sorted by key and concatenated, and the app secret
//! again.
//!
//! ```rust
//! let signed = xinde::sign_url(
//!     "https://api.xindedata.com/v1/task?appid=myappid&time=1467372594",
//!     "mySecret",
//! )?;
//! assert!(signed.as_str().ends_with("&signature=ae59ebf624b748374d69268e022147691a5ff0e6"));
//! # Ok::<(), xinde::SignError>(())
//! ```
//!
//! ## Creating and polling a task
//!
//! ```no_run
//! use xinde::XindeClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = XindeClient::builder()
//!     .app_id("myappid")
//!     .app_secret("mySecret")
//!     .build()?;
//!
//! let created = client.create_task("张三", "110101199003074477")?;
//! println!("{} {}", created.status, created.body);
//!
//! let status = client.get_task_status("1234")?;
//! println!("{}", status.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```text
//! ${PREFIX}_BASE_URL         - Base URL of the service (default https://api.xindedata.com)
//! ${PREFIX}_APP_ID           - App id
//! ${PREFIX}_APP_SECRET       - App secret
//! ${PREFIX}_APP_SECRET_FILE  - Path to a file holding the app secret (from_env_or_file only)
//! ${PREFIX}_TIMEOUT_SECS     - Connect and read timeout (default 30)
//! ```

use thiserror::Error;

pub use xinde_sign::{
    sign_url, signature, verify_signed_url, QueryParams, SignError, Signature, SignedUrl,
    SIGNATURE_PARAM,
};

pub use xinde_config::{
    get_default_config, set_default_config, try_load_default_config, ConfigError, XindeConfig,
    XindeConfigBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};

pub use xinde_api::{
    ApiError, ApiResponse, CreateTaskRequest, StatusCode, XindeClient, XindeClientBuilder,
    AUTH2_TASK_TYPE, JSON_CONTENT_TYPE,
};

/// Errors that can occur in the Xinde SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API error
    #[error("API error: {0}")]
    Api(ApiError),

    /// Signing error
    #[error("Signing error: {0}")]
    Sign(#[from] SignError),
}

// Configuration and signing failures keep their own variants instead of
// arriving wrapped in the client's error.
impl From<ApiError> for SdkError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Config(e) => SdkError::Config(e),
            ApiError::Sign(e) => SdkError::Sign(e),
            other => SdkError::Api(other),
        }
    }
}

/// Build a client for the production service, or for the process-wide
/// default configuration's base URL and timeout if one has been set.
fn client_for(app_id: &str, app_secret: &str) -> Result<XindeClient, SdkError> {
    let builder = match get_default_config() {
        Some(defaults) => XindeClient::builder().from_config(defaults),
        None => XindeClient::builder(),
    };
    Ok(builder.app_id(app_id).app_secret(app_secret).build()?)
}

/// Submit an `auth2` task and return whether the service accepted it along
/// with the response body.
///
/// The body is returned for non-2xx answers too; only transport and
/// configuration problems are errors.
pub fn create_task(
    app_id: &str,
    app_secret: &str,
    user_name: &str,
    user_id: &str,
) -> Result<(bool, String), SdkError> {
    let client = client_for(app_id, app_secret)?;
    Ok(client.create_task(user_name, user_id)?.into_parts())
}

/// Query a task's status and return the response body, success or error.
pub fn get_task_status(task_id: &str, app_id: &str, app_secret: &str) -> Result<String, SdkError> {
    let client = client_for(app_id, app_secret)?;
    Ok(client.get_task_status(task_id)?.body)
}
