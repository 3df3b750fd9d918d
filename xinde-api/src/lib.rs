//! # Xinde API
//!
//! Blocking HTTP client for the Xinde identity-verification service.
//!
//! Every request URL is signed with [`xinde_sign`] before it is sent. Calls
//! are synchronous: each one opens a connection, performs a single
//! request/response exchange and releases the connection before returning.
//!
//! ## Endpoints
//!
//! - `POST /v1/task?appid&time&signature` creates a verification task
//! - `GET /v1/task?tid&appid&time&signature` queries the status of a task
//!
//! Non-2xx responses are not errors at this layer: the status and body are
//! handed back in an [`ApiResponse`] for the caller to interpret.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use xinde_config::{ConfigError, XindeConfig};
use xinde_sign::{SignError, SignedUrl};

pub use reqwest::{Method, StatusCode};

/// Content type sent with every request
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Task type for the name + national ID number check
pub const AUTH2_TASK_TYPE: &str = "auth2";

// Error type for the API client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Signing error: {0}")]
    Sign(#[from] SignError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Request payload for creating a verification task
///
/// Serializes to `{"type":"auth2","userName":"...","userID":"..."}`; the
/// field names and their order are what the service expects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    #[serde(rename = "type")]
    pub task_type: String,
    /// Full name of the person being verified
    #[serde(rename = "userName")]
    pub user_name: String,
    /// National ID number of the person being verified
    #[serde(rename = "userID")]
    pub user_id: String,
}

impl CreateTaskRequest {
    /// An `auth2` task: check that a name and an ID number belong together
    pub fn auth2(user_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            task_type: AUTH2_TASK_TYPE.to_string(),
            user_name: user_name.into(),
            user_id: user_id.into(),
        }
    }
}

/// A signed request that has not been sent yet
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub method: Method,
    pub signed_url: SignedUrl,
    /// JSON body, for requests that have one
    pub body: Option<String>,
}

/// Result of a call to the service
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The signed URL the request was sent to
    pub signed_url: SignedUrl,
    /// The JSON body that was sent, for requests that have one
    pub request_body: Option<String>,
    /// HTTP status returned by the service
    pub status: StatusCode,
    /// Response body, success or error, as received
    pub body: String,
}

impl ApiResponse {
    /// Whether the service answered with a 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse response ({}): {}",
                self.status, e
            ))
        })
    }

    /// The `(success, body)` pair returned by task creation
    pub fn into_parts(self) -> (bool, String) {
        (self.status.is_success(), self.body)
    }
}

/// Client for the Xinde task API
pub struct XindeClient {
    config: XindeConfig,
    client: Client,
}

impl XindeClient {
    /// Create a client for the given configuration
    pub fn new(config: XindeConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let timeout = Duration::from_secs(config.timeout_secs);
        // No idle connections are kept, so every call releases its socket
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { config, client })
    }

    /// Create a new client builder
    pub fn builder() -> XindeClientBuilder {
        XindeClientBuilder::new()
    }

    pub fn config(&self) -> &XindeConfig {
        &self.config
    }

    /// Unsigned URL for creating a task at the given Unix time
    pub fn create_task_url(&self, time: i64) -> String {
        format!(
            "{}?appid={}&time={}",
            self.config.task_endpoint(),
            self.config.app_id,
            time
        )
    }

    /// Unsigned URL for querying the status of `task_id` at the given Unix time
    pub fn task_status_url(&self, task_id: &str, time: i64) -> String {
        format!(
            "{}?tid={}&appid={}&time={}",
            self.config.task_endpoint(),
            task_id,
            self.config.app_id,
            time
        )
    }

    /// Sign a URL with this client's app secret
    pub fn sign(&self, url: &str) -> Result<SignedUrl, ApiError> {
        Ok(xinde_sign::sign_url(url, &self.config.app_secret)?)
    }

    /// Submit an `auth2` task checking that `user_name` and `user_id` match
    pub fn create_task(&self, user_name: &str, user_id: &str) -> Result<ApiResponse, ApiError> {
        self.create_task_at(user_name, user_id, unix_now())
    }

    /// Like [`create_task`](Self::create_task) with an explicit Unix time
    pub fn create_task_at(
        &self,
        user_name: &str,
        user_id: &str,
        time: i64,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.prepare_create_task(user_name, user_id, time)?;
        info!(appid = %self.config.app_id, "creating verification task");
        self.send(request)
    }

    /// Query the status of a previously created task
    pub fn get_task_status(&self, task_id: &str) -> Result<ApiResponse, ApiError> {
        self.get_task_status_at(task_id, unix_now())
    }

    /// Like [`get_task_status`](Self::get_task_status) with an explicit Unix time
    pub fn get_task_status_at(&self, task_id: &str, time: i64) -> Result<ApiResponse, ApiError> {
        let request = self.prepare_task_status(task_id, time)?;
        info!(tid = %task_id, "querying task status");
        self.send(request)
    }

    /// Sign the task creation URL and serialize the body without sending anything
    pub fn prepare_create_task(
        &self,
        user_name: &str,
        user_id: &str,
        time: i64,
    ) -> Result<TaskRequest, ApiError> {
        Ok(TaskRequest {
            method: Method::POST,
            signed_url: self.sign(&self.create_task_url(time))?,
            body: Some(serde_json::to_string(&CreateTaskRequest::auth2(
                user_name, user_id,
            ))?),
        })
    }

    /// Sign the task status URL without sending anything
    pub fn prepare_task_status(&self, task_id: &str, time: i64) -> Result<TaskRequest, ApiError> {
        Ok(TaskRequest {
            method: Method::GET,
            signed_url: self.sign(&self.task_status_url(task_id, time))?,
            body: None,
        })
    }

    /// Send a prepared request
    pub fn send(&self, request: TaskRequest) -> Result<ApiResponse, ApiError> {
        let TaskRequest {
            method,
            signed_url,
            body,
        } = request;

        let mut builder = self
            .client
            .request(method, signed_url.as_str())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = &body {
            builder = builder.body(body.clone());
        }

        debug!(url = %signed_url, "sending request");
        let response = builder.send()?;
        let status = response.status();
        // Reading the body to the end consumes the response and frees the connection
        let text = response.text()?;
        debug!(%status, bytes = text.len(), "received response");

        Ok(ApiResponse {
            signed_url,
            request_body: body,
            status,
            body: text,
        })
    }
}

/// Current Unix time in seconds, the value sent as `time`
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Builder for creating Xinde clients
#[derive(Default)]
pub struct XindeClientBuilder {
    config: xinde_config::XindeConfigBuilder,
}

impl XindeClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(mut self, config: &XindeConfig) -> Self {
        self.config = config.to_builder();
        self
    }

    /// Set the base URL of the service
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.base_url(base_url);
        self
    }

    /// Set the app id
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.config = self.config.app_id(app_id);
        self
    }

    /// Set the app secret
    pub fn app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.config = self.config.app_secret(app_secret);
        self
    }

    /// Set the connect and read timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config = self.config.timeout_secs(timeout_secs);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<XindeClient, ApiError> {
        XindeClient::new(self.config.build()?)
    }
}
