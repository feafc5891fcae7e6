//! HTTP callback authentication
//!
//! Sends form data in a POST request to a configured URL. A 2xx response
//! allows the publish/play, anything else denies it. The request fields match
//! nginx-rtmp's `on_publish`/`on_play` callbacks, so existing endpoints for
//! those directives work unchanged.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use super::stream_id::StreamId;
use super::Authenticator;

/// HTTP auth backend configuration
#[derive(Debug, Clone)]
pub struct HttpAuthConfig {
    /// Callback URL
    pub url: String,

    /// Value sent as the `app` field
    pub application: String,

    /// Bound on the whole request
    pub timeout: Duration,

    /// Form field carrying the stream password
    pub password_param: String,
}

impl Default for HttpAuthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            application: "stream".to_string(),
            timeout: Duration::from_secs(1),
            password_param: "auth".to_string(),
        }
    }
}

impl HttpAuthConfig {
    /// Create a config for the given callback URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the application name
    pub fn application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the password form field name
    pub fn password_param(mut self, param: impl Into<String>) -> Self {
        self.password_param = param.into();
        self
    }
}

/// HTTP auth failures
///
/// Never escapes [`Authenticator::authenticate`]; every variant means denial.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http-auth request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http-auth rejected with status {0}")]
    Status(StatusCode),
}

/// Authenticator backed by an HTTP callback
#[derive(Debug, Clone)]
pub struct HttpAuth {
    config: HttpAuthConfig,
    client: reqwest::Client,
}

impl HttpAuth {
    /// Create a new HTTP authenticator
    pub fn new(config: HttpAuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, client })
    }

    /// Get the backend configuration
    pub fn config(&self) -> &HttpAuthConfig {
        &self.config
    }

    async fn request(&self, stream_id: &StreamId) -> Result<(), AuthError> {
        let form = [
            ("call", stream_id.mode().as_str()),
            ("app", self.config.application.as_str()),
            ("name", stream_id.name()),
            (self.config.password_param.as_str(), stream_id.password()),
        ];

        let response = self
            .client
            .post(&self.config.url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        Ok(())
    }
}

impl Authenticator for HttpAuth {
    async fn authenticate(&self, stream_id: &StreamId) -> bool {
        match self.request(stream_id).await {
            Ok(()) => true,
            Err(AuthError::Status(status)) => {
                tracing::debug!(
                    stream = %stream_id.name(),
                    mode = %stream_id.mode(),
                    status = %status,
                    "Denied by http-auth"
                );
                false
            }
            Err(e) => {
                tracing::warn!(stream = %stream_id.name(), error = %e, "http-auth failed");
                false
            }
        }
    }
}
