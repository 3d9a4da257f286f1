//! The v2 resource envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned metadata of a v2 resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Resource GUID
    pub guid: String,
    /// Relative URL of the resource
    #[serde(default)]
    pub url: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A v2 resource: metadata plus a typed entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<E> {
    /// Server-assigned metadata
    pub metadata: Metadata,
    /// The resource body
    pub entity: E,
}

impl<E> Resource<E> {
    /// The resource GUID.
    pub fn id(&self) -> &str {
        &self.metadata.guid
    }
}
