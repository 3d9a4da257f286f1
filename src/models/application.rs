//! Application models (v2).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource::Resource;

/// The body of a v2 application resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationEntity {
    /// Application name
    pub name: String,
    /// GUID of the owning space
    pub space_guid: String,
    /// GUID of the stack the application runs on
    #[serde(default)]
    pub stack_guid: Option<String>,
    /// Desired state (`STARTED` or `STOPPED`)
    #[serde(default)]
    pub state: Option<String>,
    /// Staging state (`PENDING`, `STAGED`, `FAILED`)
    #[serde(default)]
    pub package_state: Option<String>,
    /// Number of instances
    #[serde(default)]
    pub instances: Option<u32>,
    /// Memory per instance in megabytes
    #[serde(default)]
    pub memory: Option<u32>,
    /// Disk quota per instance in megabytes
    #[serde(default)]
    pub disk_quota: Option<u32>,
    /// Buildpack name or URL set by the user
    #[serde(default)]
    pub buildpack: Option<String>,
    /// Start command set by the user
    #[serde(default)]
    pub command: Option<String>,
    /// User-provided environment variables
    #[serde(default)]
    pub environment_json: Option<HashMap<String, Value>>,
}

/// A v2 application resource.
pub type ApplicationResource = Resource<ApplicationEntity>;
