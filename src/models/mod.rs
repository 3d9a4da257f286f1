//! Data models for the Cloud Foundry API.
//!
//! - [`pagination`] - Paging parameters and list response envelopes
//! - [`resource`] - The v2 `{metadata, entity}` envelope
//! - [`enums`] - Enumeration types
//! - Entity models for applications, buildpacks, domains, events and tasks

pub mod application;
pub mod buildpack;
pub mod domain;
pub mod enums;
pub mod event;
pub mod info;
pub mod pagination;
pub mod resource;
pub mod task;

pub use application::*;
pub use buildpack::*;
pub use domain::*;
pub use enums::*;
pub use event::*;
pub use info::*;
pub use pagination::*;
pub use resource::*;
pub use task::*;
