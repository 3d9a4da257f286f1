//! API service modules.
//!
//! Each service groups the operations of one Cloud Foundry resource. Every
//! operation takes a request value that declares its path, query and filter
//! parameters; list operations also come in a streaming form that walks all
//! pages.
//!
//! - [`ApplicationsService`] - Applications (v2)
//! - [`BuildpacksService`] - Buildpack bits upload (v2)
//! - [`DomainsService`] - Domains (v2)
//! - [`EventsService`] - Audit events (v2)
//! - [`TasksService`] - Tasks (v3)

mod applications;
mod buildpacks;
mod domains;
mod events;
mod tasks;

pub use applications::{
    ApplicationRequest, ApplicationsService, DeleteApplicationRequest, ListApplicationsRequest,
};
pub use buildpacks::{BuildpacksService, UploadBuildpackRequest};
pub use domains::{DomainRequest, DomainsService, ListDomainsRequest};
pub use events::{EventRequest, EventsService, ListEventsRequest};
pub use tasks::{CreateTaskRequest, ListTasksRequest, TaskRequest, TasksService};
