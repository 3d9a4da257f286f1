//! Token source backed by the UAA `/oauth/token` endpoint.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use super::{Credential, TokenSource};
use crate::client::{decode, send};
use crate::{Error, Result};

/// How the initial token is obtained.
pub enum TokenGrant {
    /// Resource owner password grant
    Password {
        /// User name
        username: String,
        /// Password
        password: SecretString,
    },
    /// Client credentials grant, authenticating as the OAuth client itself
    ClientCredentials,
    /// Refresh token grant with a previously issued refresh token
    RefreshToken(SecretString),
}

impl TokenGrant {
    /// A password grant.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        TokenGrant::Password {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// A refresh token grant.
    pub fn refresh_token(token: impl Into<String>) -> Self {
        TokenGrant::RefreshToken(SecretString::from(token.into()))
    }
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenGrant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            TokenGrant::ClientCredentials => f.write_str("ClientCredentials"),
            TokenGrant::RefreshToken(_) => f.write_str("RefreshToken([REDACTED])"),
        }
    }
}

/// Fetches tokens from UAA.
///
/// The client authenticates with HTTP basic auth. Once a refresh token has
/// been issued, later fetches use it instead of the original grant.
pub struct UaaTokenSource {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    client_secret: SecretString,
    grant: TokenGrant,
    refresh_token: Mutex<Option<SecretString>>,
}

impl UaaTokenSource {
    /// Create a token source for the UAA server rooted at `uaa_root`.
    pub fn new(
        http: reqwest::Client,
        uaa_root: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        grant: TokenGrant,
    ) -> Result<Self> {
        let mut token_url = Url::parse(uaa_root)?;
        token_url
            .path_segments_mut()
            .map_err(|_| Error::Validation(format!("UAA root is not a base URL: {uaa_root}")))?
            .pop_if_empty()
            .extend(["oauth", "token"]);

        Ok(Self {
            http,
            token_url,
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            grant,
            refresh_token: Mutex::new(None),
        })
    }

    /// The token endpoint this source posts to.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let builder = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .header(ACCEPT, "application/json")
            .form(form);

        let response = send(builder).await?;
        decode(response).await
    }
}

#[async_trait]
impl TokenSource for UaaTokenSource {
    async fn fetch(&self) -> Result<Credential> {
        let mut refresh_token = self.refresh_token.lock().await;

        let result = match (refresh_token.as_ref(), &self.grant) {
            (Some(token), _) | (None, TokenGrant::RefreshToken(token)) => {
                self.request_token(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", token.expose_secret()),
                ])
                .await
            }
            (None, TokenGrant::Password { username, password }) => {
                self.request_token(&[
                    ("grant_type", "password"),
                    ("response_type", "token"),
                    ("username", username.as_str()),
                    ("password", password.expose_secret()),
                ])
                .await
            }
            (None, TokenGrant::ClientCredentials) => {
                self.request_token(&[
                    ("grant_type", "client_credentials"),
                    ("response_type", "token"),
                ])
                .await
            }
        };

        // A rejected refresh token falls back to the original grant next time.
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                *refresh_token = None;
                return Err(e);
            }
        };

        if let Some(token) = response.refresh_token {
            *refresh_token = Some(SecretString::from(token));
        }

        let expires_at = response
            .expires_in
            .map(|secs| {
                Duration::try_seconds(secs)
                    .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                    .ok_or_else(|| Error::Decode {
                        message: format!("token expires_in out of range: {secs}"),
                        body: None,
                    })
            })
            .transpose()?;

        Ok(Credential::new(
            response.token_type.unwrap_or_else(|| "bearer".to_string()),
            response.access_token,
            expires_at,
        ))
    }
}

impl std::fmt::Debug for UaaTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaTokenSource")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("grant", &self.grant)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}
