//! Applications service (v2).

use std::sync::Arc;

use reqwest::{Method, Response};

use crate::client::paginated::PaginatedStream;
use crate::client::params::{ApiRequest, Parameters};
use crate::client::{ClientInner, PaginatedRequest};
use crate::models::{ApplicationResource, ListResponse, PageQuery};
use crate::Result;

/// Service for application operations.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use cloudfoundry_rs::api::ListApplicationsRequest;
///
/// # async fn example(client: cloudfoundry_rs::CloudFoundryClient) -> cloudfoundry_rs::Result<()> {
/// let request = ListApplicationsRequest {
///     space_ids: Some(vec!["7b8c3e4a-2f1d-4c5b-9a6e-0d1f2a3b4c5d".to_string()]),
///     ..Default::default()
/// };
///
/// let apps: Vec<_> = client.applications().list_stream(request).try_collect().await?;
/// for app in &apps {
///     println!("{} ({})", app.entity.name, app.id());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ApplicationsService {
    inner: Arc<ClientInner>,
}

/// Filters for listing applications.
#[derive(Debug, Clone, Default)]
pub struct ListApplicationsRequest {
    /// Match any of these application names
    pub names: Option<Vec<String>>,
    /// Match applications in any of these spaces
    pub space_ids: Option<Vec<String>>,
    /// Match applications in any of these organizations
    pub organization_ids: Option<Vec<String>>,
    /// Match applications on any of these stacks
    pub stack_ids: Option<Vec<String>>,
    /// Paging
    pub page: PageQuery,
}

impl ApiRequest for ListApplicationsRequest {
    fn parameters(&self, params: &mut Parameters) {
        params
            .filter_in("name", self.names.as_deref())
            .filter_in("space_guid", self.space_ids.as_deref())
            .filter_in("organization_guid", self.organization_ids.as_deref())
            .filter_in("stack_guid", self.stack_ids.as_deref());
        self.page.declare(params);
    }
}

impl PaginatedRequest for ListApplicationsRequest {
    fn with_page(&self, page: u32) -> Self {
        Self {
            page: self.page.at(page),
            ..self.clone()
        }
    }
}

/// Identifies a single application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRequest {
    /// Application GUID
    pub application_id: String,
}

impl ApplicationRequest {
    /// Target the application with the given GUID.
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
        }
    }
}

impl ApiRequest for ApplicationRequest {
    fn parameters(&self, params: &mut Parameters) {
        params.path("application_id", &self.application_id);
    }
}

/// Deletes an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteApplicationRequest {
    /// Application GUID
    pub application_id: String,
    /// Also delete service bindings and routes owned by the application
    pub recursive: Option<bool>,
}

impl ApiRequest for DeleteApplicationRequest {
    fn parameters(&self, params: &mut Parameters) {
        params
            .path("application_id", &self.application_id)
            .query("recursive", self.recursive);
    }
}

impl ApplicationsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch a single page of applications.
    pub async fn list(
        &self,
        request: &ListApplicationsRequest,
    ) -> Result<ListResponse<ApplicationResource>> {
        self.inner.execute(Method::GET, "/v2/apps", request).await
    }

    /// Stream every application matching `request`, page by page.
    ///
    /// Any page set on the request is ignored; the walk starts at page 1.
    pub fn list_stream(
        &self,
        request: ListApplicationsRequest,
    ) -> PaginatedStream<ApplicationResource> {
        self.inner
            .paginate::<_, ListResponse<ApplicationResource>>("/v2/apps", request)
    }

    /// Get an application by GUID.
    pub async fn get(&self, request: &ApplicationRequest) -> Result<ApplicationResource> {
        self.inner
            .execute(Method::GET, "/v2/apps/{application_id}", request)
            .await
    }

    /// Delete an application.
    pub async fn delete(&self, request: &DeleteApplicationRequest) -> Result<()> {
        self.inner
            .execute_empty(Method::DELETE, "/v2/apps/{application_id}", request)
            .await
    }

    /// Download the application's uploaded bits.
    ///
    /// The response is returned unread so large archives can be streamed
    /// with [`Response::bytes_stream`] or [`Response::chunk`].
    pub async fn download(&self, request: &ApplicationRequest) -> Result<Response> {
        self.inner
            .execute_raw(Method::GET, "/v2/apps/{application_id}/download", request)
            .await
    }
}
