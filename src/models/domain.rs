//! Domain models (v2).

use serde::{Deserialize, Serialize};

use super::resource::Resource;

/// The body of a v2 domain resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntity {
    /// Fully qualified domain name
    pub name: String,
    /// Owning organization, absent for shared domains
    #[serde(default)]
    pub owning_organization_guid: Option<String>,
    /// Whether wildcard routes are allowed
    #[serde(default)]
    pub wildcard: Option<bool>,
}

impl DomainEntity {
    /// Returns `true` if the domain is shared across all organizations.
    pub fn is_shared(&self) -> bool {
        self.owning_organization_guid.is_none()
    }
}

/// A v2 domain resource.
pub type DomainResource = Resource<DomainEntity>;
