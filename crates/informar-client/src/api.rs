//! Thin HTTP wrapper over the dashboard's backend REST API.
//!
//! The backend proxies the external ad-tracking platform; this side only
//! needs JSON in and out with a timeout. Controllers depend on the [`Api`]
//! trait so tests can inject a mock instead of a live server.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("API returned status {status} for {path}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
    },
    /// The request never completed (connection, DNS, timeout).
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// JSON REST operations used by the page controllers.
pub trait Api: Send + Sync {
    /// GET a JSON document.
    fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    /// POST a JSON body, returning the JSON response.
    fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// PUT a JSON body, returning the JSON response.
    fn put_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// DELETE, returning the JSON response.
    fn delete_json(&self, path: &str) -> Result<Value, ApiError>;
}

/// Blocking HTTP implementation of [`Api`].
#[derive(Debug)]
pub struct HttpApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("informar/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn handle(&self, path: &str, response: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        response
            .json::<Value>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Api for HttpApi {
    fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        self.handle(path, response)
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        self.handle(path, response)
    }

    fn put_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        self.handle(path, response)
    }

    fn delete_json(&self, path: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        self.handle(path, response)
    }
}
