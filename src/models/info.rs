//! Cloud controller information (`/v2/info`).

use serde::{Deserialize, Serialize};

/// Public, unauthenticated description of a cloud controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// Platform name
    #[serde(default)]
    pub name: Option<String>,
    /// Build identifier
    #[serde(default)]
    pub build: Option<String>,
    /// Support contact
    #[serde(default)]
    pub support: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Login server root
    #[serde(default)]
    pub authorization_endpoint: Option<String>,
    /// UAA root used for token requests
    pub token_endpoint: String,
    /// Version of the v2 API
    #[serde(default)]
    pub api_version: Option<String>,
    /// Endpoint of the application log stream
    #[serde(default)]
    pub doppler_logging_endpoint: Option<String>,
}
