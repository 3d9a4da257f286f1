//! # cloudfoundry-rs
//!
//! An async Rust client for the Cloud Foundry cloud controller API.
//!
//! Every endpoint call runs through one request pipeline: a typed request
//! declares its path, query and filter parameters, the client resolves them
//! into a URI, attaches an authorization header, performs the exchange and
//! normalizes any failure into an [`Error`]. List endpoints are exposed as
//! lazy [`Stream`](futures_util::Stream)s that walk every page in order.
//!
//! ## Features
//!
//! - **Authentication**: UAA password, client credentials and refresh token
//!   grants, with coalesced token refresh shared across concurrent requests
//! - **Pagination**: v2 and v3 list endpoints as cancellable streams
//! - **Errors**: v2, v3 and UAA error payloads decoded into one error type
//! - **Async-first**: Built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures_util::TryStreamExt;
//! use cloudfoundry_rs::{CloudFoundryClient, ClientConfig};
//! use cloudfoundry_rs::api::ListApplicationsRequest;
//! use cloudfoundry_rs::auth::TokenGrant;
//!
//! #[tokio::main]
//! async fn main() -> cloudfoundry_rs::Result<()> {
//!     let client = CloudFoundryClient::connect(
//!         ClientConfig::new("https://api.run.example.com"),
//!         TokenGrant::password("admin", "secret"),
//!     )
//!     .await?;
//!
//!     let apps: Vec<_> = client
//!         .applications()
//!         .list_stream(ListApplicationsRequest::default())
//!         .try_collect()
//!         .await?;
//!     println!("Found {} applications", apps.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Cancelling a Walk
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use tokio_util::sync::CancellationToken;
//! use cloudfoundry_rs::api::ListEventsRequest;
//!
//! # async fn example(client: cloudfoundry_rs::CloudFoundryClient) -> cloudfoundry_rs::Result<()> {
//! let token = CancellationToken::new();
//! let mut events = client
//!     .events()
//!     .list_stream(ListEventsRequest::default())
//!     .with_cancellation(token.clone());
//!
//! while let Some(event) = events.next().await {
//!     let event = event?;
//!     if event.entity.event_type == "audit.app.delete-request" {
//!         token.cancel();
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{translate, Error, ErrorKind, Result};
pub use client::{ClientConfig, CloudFoundryClient};

/// Prelude module for convenient imports.
///
/// ```rust
/// use cloudfoundry_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ApplicationRequest, CreateTaskRequest, DeleteApplicationRequest, DomainRequest,
        EventRequest, ListApplicationsRequest, ListDomainsRequest, ListEventsRequest,
        ListTasksRequest, TaskRequest, UploadBuildpackRequest,
    };
    pub use crate::auth::{AuthorizationProvider, Session, StaticToken, TokenGrant};
    pub use crate::client::{ClientConfig, CloudFoundryClient, PaginatedStream};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::models::{
        ApplicationResource, BuildpackResource, DomainResource, EventResource, OrderDirection,
        PageQuery, PageQueryV3, Task, TaskState,
    };
}
