//! Client configuration options.

use std::time::Duration;

use chrono::TimeDelta;
use secrecy::SecretString;
use url::Url;

use crate::{Error, Result};

/// Configuration for the Cloud Foundry client.
///
/// # Example
///
/// ```
/// use cloudfoundry_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://api.run.example.com")
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the cloud controller API
    pub api_root: String,
    /// Request timeout, surfaced as a transport error when exceeded
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Accept invalid TLS certificates (self-signed test installations)
    pub skip_ssl_validation: bool,
    /// Buffer time (in seconds) before expiry to refresh credentials
    pub refresh_buffer_secs: i64,
    /// OAuth client used for UAA token requests
    pub client_id: String,
    /// OAuth client secret used for UAA token requests
    pub client_secret: SecretString,
}

impl ClientConfig {
    /// Create a configuration for the API rooted at `api_root`.
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("cloudfoundry-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            skip_ssl_validation: false,
            refresh_buffer_secs: 60,
            client_id: "cf".to_string(),
            client_secret: SecretString::from(String::new()),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Accept invalid TLS certificates.
    pub fn with_skip_ssl_validation(mut self, skip: bool) -> Self {
        self.skip_ssl_validation = skip;
        self
    }

    /// Set the buffer time before expiry to refresh.
    pub fn with_refresh_buffer(mut self, secs: i64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }

    /// Set the OAuth client used for token requests.
    pub fn with_client(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self.client_secret = SecretString::from(client_secret.into());
        self
    }

    /// Parse and check the API root.
    pub(crate) fn root_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_root)
            .map_err(|e| Error::Validation(format!("invalid API root {:?}: {e}", self.api_root)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "API root must be an http(s) URL: {}",
                self.api_root
            )));
        }
        Ok(url)
    }

    /// The refresh buffer as a time span.
    pub(crate) fn refresh_buffer(&self) -> Result<TimeDelta> {
        if self.refresh_buffer_secs < 0 {
            return Err(Error::Validation(format!(
                "refresh buffer must not be negative: {}",
                self.refresh_buffer_secs
            )));
        }
        TimeDelta::try_seconds(self.refresh_buffer_secs).ok_or_else(|| {
            Error::Validation(format!(
                "refresh buffer out of range: {}",
                self.refresh_buffer_secs
            ))
        })
    }

    /// Build the HTTP transport described by this configuration.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .danger_accept_invalid_certs(self.skip_ssl_validation)
            .build()
            .map_err(|e| Error::Validation(format!("failed to build HTTP client: {e}")))
    }
}
