//! HTTP client and request pipeline for the Cloud Foundry API.
//!
//! [`CloudFoundryClient`] is the entry point. Underneath it, every endpoint
//! call goes through the same pipeline: [`build_uri`] resolves the request's
//! declared parameters against a path template, the configured
//! [`AuthorizationProvider`](crate::auth::AuthorizationProvider) supplies a
//! credential, one exchange is performed, and failures are normalized by
//! [`translate`](crate::error::translate). List endpoints feed that pipeline
//! into [`paginate`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cloudfoundry_rs::{CloudFoundryClient, ClientConfig};
//! use cloudfoundry_rs::auth::StaticToken;
//!
//! # async fn example() -> cloudfoundry_rs::Result<()> {
//! let client = CloudFoundryClient::new(
//!     ClientConfig::new("https://api.run.example.com"),
//!     Arc::new(StaticToken::bearer("eyJhbGciOi...")),
//! )?;
//!
//! let info = client.info().await?;
//! println!("API version {:?}", info.api_version);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
pub mod params;

pub use config::ClientConfig;
pub use http::CloudFoundryClient;
pub use paginated::{next_page, paginate, Page, PaginatedRequest, PaginatedStream, FIRST_PAGE};
pub use params::{build_uri, ApiRequest, FilterOperator, MultiValue, Parameters};
pub(crate) use http::{decode, send, ClientInner};
