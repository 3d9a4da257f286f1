//! Audit events service (v2).

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;

use crate::client::paginated::PaginatedStream;
use crate::client::params::{ApiRequest, FilterOperator, Parameters};
use crate::client::{ClientInner, PaginatedRequest};
use crate::models::{EventResource, ListResponse, PageQuery};
use crate::Result;

/// Service for audit event operations.
///
/// # Example
///
/// ```no_run
/// use chrono::{Duration, Utc};
/// use futures_util::StreamExt;
/// use cloudfoundry_rs::api::ListEventsRequest;
///
/// # async fn example(client: cloudfoundry_rs::CloudFoundryClient) -> cloudfoundry_rs::Result<()> {
/// let request = ListEventsRequest {
///     types: Some(vec!["audit.app.update".to_string()]),
///     since: Some(Utc::now() - Duration::days(1)),
///     ..Default::default()
/// };
///
/// let mut events = client.events().list_stream(request);
/// while let Some(event) = events.next().await {
///     let event = event?;
///     println!("{} by {:?}", event.entity.event_type, event.entity.actor_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct EventsService {
    inner: Arc<ClientInner>,
}

/// Filters for listing audit events.
#[derive(Debug, Clone, Default)]
pub struct ListEventsRequest {
    /// Match events about any of these resources
    pub actees: Option<Vec<String>>,
    /// Match any of these event types, e.g. `audit.app.create`
    pub types: Option<Vec<String>>,
    /// Match events at or after this time
    pub since: Option<DateTime<Utc>>,
    /// Match events strictly before this time
    pub before: Option<DateTime<Utc>>,
    /// Paging
    pub page: PageQuery,
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl ApiRequest for ListEventsRequest {
    fn parameters(&self, params: &mut Parameters) {
        params
            .filter_in("actee", self.actees.as_deref())
            .filter_in("type", self.types.as_deref())
            .filter("timestamp", FilterOperator::Ge, self.since.as_ref().map(timestamp))
            .filter("timestamp", FilterOperator::Lt, self.before.as_ref().map(timestamp));
        self.page.declare(params);
    }
}

impl PaginatedRequest for ListEventsRequest {
    fn with_page(&self, page: u32) -> Self {
        Self {
            page: self.page.at(page),
            ..self.clone()
        }
    }
}

/// Identifies a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    /// Event GUID
    pub event_id: String,
}

impl EventRequest {
    /// Target the event with the given GUID.
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
        }
    }
}

impl ApiRequest for EventRequest {
    fn parameters(&self, params: &mut Parameters) {
        params.path("event_id", &self.event_id);
    }
}

impl EventsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get an event by GUID.
    pub async fn get(&self, request: &EventRequest) -> Result<EventResource> {
        self.inner
            .execute(Method::GET, "/v2/events/{event_id}", request)
            .await
    }

    /// Fetch a single page of events.
    pub async fn list(&self, request: &ListEventsRequest) -> Result<ListResponse<EventResource>> {
        self.inner.execute(Method::GET, "/v2/events", request).await
    }

    /// Stream every event matching `request`.
    pub fn list_stream(&self, request: ListEventsRequest) -> PaginatedStream<EventResource> {
        self.inner
            .paginate::<_, ListResponse<EventResource>>("/v2/events", request)
    }
}
