//! Audit event models (v2).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource::Resource;

/// The body of a v2 audit event resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntity {
    /// Event type, e.g. `audit.app.update`
    #[serde(rename = "type")]
    pub event_type: String,
    /// GUID of the actor
    #[serde(default)]
    pub actor: Option<String>,
    /// Kind of actor (`user`, `app`, ...)
    #[serde(default)]
    pub actor_type: Option<String>,
    /// Display name of the actor
    #[serde(default)]
    pub actor_name: Option<String>,
    /// GUID of the resource acted upon
    #[serde(default)]
    pub actee: Option<String>,
    /// Kind of resource acted upon
    #[serde(default)]
    pub actee_type: Option<String>,
    /// Display name of the resource acted upon
    #[serde(default)]
    pub actee_name: Option<String>,
    /// When the event happened
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Event-specific details
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Space the event belongs to
    #[serde(default)]
    pub space_guid: Option<String>,
    /// Organization the event belongs to
    #[serde(default)]
    pub organization_guid: Option<String>,
}

/// A v2 audit event resource.
pub type EventResource = Resource<EventEntity>;
