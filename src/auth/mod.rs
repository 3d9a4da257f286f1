//! Authorization for outgoing requests.
//!
//! Every request carries the credential returned by an
//! [`AuthorizationProvider`]. Two providers are included:
//!
//! 1. [`StaticToken`] - a fixed, pre-obtained bearer token
//! 2. [`Session`] - fetches tokens from a [`TokenSource`] (usually
//!    [`UaaTokenSource`]) and refreshes them before they expire
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cloudfoundry_rs::auth::{Session, TokenGrant, UaaTokenSource};
//!
//! # fn example() -> cloudfoundry_rs::Result<()> {
//! let source = UaaTokenSource::new(
//!     reqwest::Client::new(),
//!     "https://uaa.example.com",
//!     "cf",
//!     "",
//!     TokenGrant::password("admin", "secret"),
//! )?;
//! let session = Session::new(Arc::new(source));
//! # Ok(())
//! # }
//! ```

mod session;
mod uaa;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

pub use session::{Session, TokenSource};
pub use uaa::{TokenGrant, UaaTokenSource};

/// Supplies the credential attached to each outgoing request.
///
/// Implementations are shared between concurrent requests and may refresh
/// the credential asynchronously.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// The credential to use for the next request.
    async fn authorization(&self) -> Result<Arc<Credential>>;
}

/// A bearer credential.
///
/// Credentials are immutable; a refresh replaces the whole value.
pub struct Credential {
    token_type: String,
    access_token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential.
    pub fn new(
        token_type: impl Into<String>,
        access_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: SecretString::from(access_token.into()),
            expires_at,
        }
    }

    /// A bearer credential that never expires.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new("bearer", access_token, None)
    }

    /// The token type, usually `bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// When the credential expires, if known.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the credential will expire within `buffer`.
    pub fn expires_within(&self, buffer: Duration) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        match Utc::now().checked_add_signed(buffer) {
            Some(deadline) => deadline >= expires_at,
            // Past the representable range: only a positive buffer reaches it.
            None => buffer > Duration::zero(),
        }
    }

    /// The `Authorization` header value for this credential.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!(
            "{} {}",
            self.token_type,
            self.access_token.expose_secret()
        ))
        .map_err(|_| Error::Validation("Invalid token format".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token_type", &self.token_type)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A provider that always returns the same credential.
#[derive(Debug, Clone)]
pub struct StaticToken {
    credential: Arc<Credential>,
}

impl StaticToken {
    /// Use `credential` for every request.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Arc::new(credential),
        }
    }

    /// Use a non-expiring bearer token for every request.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new(Credential::bearer(access_token))
    }
}

#[async_trait]
impl AuthorizationProvider for StaticToken {
    async fn authorization(&self) -> Result<Arc<Credential>> {
        Ok(self.credential.clone())
    }
}
