// Alert source provider framework
pub mod prometheus;

pub use prometheus::PrometheusProvider;

use crate::types::AlertDto;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Query failed with status {status}: {body}")]
    QueryFailed { status: u16, body: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Connection settings for an alert source.
///
/// Credentials are attached to outbound requests only when both username and
/// password are present and non-empty.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProviderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Returns the credential pair, or None when either half is missing or
    /// empty. A half-configured pair sends unauthenticated.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

// Manual Debug so the password never reaches logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
pub trait AlertProvider: Send + Sync {
    /// Executes a read-only query against the monitoring source and returns
    /// the decoded response body.
    async fn query(&self, expr: &str) -> Result<Value, ProviderError>;

    /// Pulls the currently active alerts, normalized. A source outage yields
    /// an empty list rather than an error so polling callers keep running.
    async fn get_alerts(&self) -> Result<Vec<AlertDto>, ProviderError>;

    /// Read-only sources do not implement notify.
    async fn notify(&self, _params: Value) -> Result<(), ProviderError> {
        Err(ProviderError::NotSupported(format!(
            "{} provider does not support notify()",
            self.name()
        )))
    }

    fn name(&self) -> &'static str;
}
