//! Buildpack models (v2).

use serde::{Deserialize, Serialize};

use super::resource::Resource;

/// The body of a v2 buildpack resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildpackEntity {
    /// Buildpack name
    pub name: String,
    /// Detection order
    #[serde(default)]
    pub position: Option<u32>,
    /// Whether the buildpack takes part in detection
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Whether the bits are locked against updates
    #[serde(default)]
    pub locked: Option<bool>,
    /// File name of the uploaded bits
    #[serde(default)]
    pub filename: Option<String>,
}

/// A v2 buildpack resource.
pub type BuildpackResource = Resource<BuildpackEntity>;
