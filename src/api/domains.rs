//! Domains service (v2).

use std::sync::Arc;

use reqwest::Method;

use crate::client::paginated::PaginatedStream;
use crate::client::params::{ApiRequest, Parameters};
use crate::client::{ClientInner, PaginatedRequest};
use crate::models::{DomainResource, ListResponse, PageQuery};
use crate::Result;

/// Service for domain operations.
pub struct DomainsService {
    inner: Arc<ClientInner>,
}

/// Filters for listing domains.
#[derive(Debug, Clone, Default)]
pub struct ListDomainsRequest {
    /// Match any of these domain names
    pub names: Option<Vec<String>>,
    /// Match domains owned by any of these organizations
    pub owning_organization_ids: Option<Vec<String>>,
    /// Paging
    pub page: PageQuery,
}

impl ApiRequest for ListDomainsRequest {
    fn parameters(&self, params: &mut Parameters) {
        params
            .filter_in("name", self.names.as_deref())
            .filter_in("owning_organization_guid", self.owning_organization_ids.as_deref());
        self.page.declare(params);
    }
}

impl PaginatedRequest for ListDomainsRequest {
    fn with_page(&self, page: u32) -> Self {
        Self {
            page: self.page.at(page),
            ..self.clone()
        }
    }
}

/// Identifies a single domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRequest {
    /// Domain GUID
    pub domain_id: String,
}

impl DomainRequest {
    /// Target the domain with the given GUID.
    pub fn new(domain_id: impl Into<String>) -> Self {
        Self {
            domain_id: domain_id.into(),
        }
    }
}

impl ApiRequest for DomainRequest {
    fn parameters(&self, params: &mut Parameters) {
        params.path("domain_id", &self.domain_id);
    }
}

impl DomainsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch a single page of domains.
    pub async fn list(&self, request: &ListDomainsRequest) -> Result<ListResponse<DomainResource>> {
        self.inner.execute(Method::GET, "/v2/domains", request).await
    }

    /// Stream every domain matching `request`.
    pub fn list_stream(&self, request: ListDomainsRequest) -> PaginatedStream<DomainResource> {
        self.inner
            .paginate::<_, ListResponse<DomainResource>>("/v2/domains", request)
    }

    /// Get a domain by GUID.
    pub async fn get(&self, request: &DomainRequest) -> Result<DomainResource> {
        self.inner
            .execute(Method::GET, "/v2/domains/{domain_id}", request)
            .await
    }

    /// Delete a domain.
    pub async fn delete(&self, request: &DomainRequest) -> Result<()> {
        self.inner
            .execute_empty(Method::DELETE, "/v2/domains/{domain_id}", request)
            .await
    }
}
