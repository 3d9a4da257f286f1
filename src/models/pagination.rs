//! Pagination request parameters and list response envelopes.
//!
//! The v2 API wraps list results as
//! `{total_results, total_pages, prev_url, next_url, resources}`, while v3
//! nests the metadata under `pagination`. Both implement
//! [`Page`](crate::client::Page) so either can feed a
//! [`PaginatedStream`](crate::client::PaginatedStream).

use serde::{Deserialize, Serialize};

use super::enums::OrderDirection;
use crate::client::{Page, Parameters};

/// Paging parameters of a v2 list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Results per page (server maximum is 100)
    pub results_per_page: Option<u32>,
    /// Sort direction
    pub order_direction: Option<OrderDirection>,
}

impl PageQuery {
    pub(crate) fn declare(&self, params: &mut Parameters) {
        params
            .query("order-direction", self.order_direction)
            .query("page", self.page)
            .query("results-per-page", self.results_per_page);
    }

    pub(crate) fn at(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }
}

/// Paging parameters of a v3 list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQueryV3 {
    /// 1-based page number
    pub page: Option<u32>,
    /// Results per page
    pub per_page: Option<u32>,
    /// Sort field, prefixed with `-` for descending order
    pub order_by: Option<String>,
}

impl PageQueryV3 {
    pub(crate) fn declare(&self, params: &mut Parameters) {
        params
            .query("page", self.page)
            .query("per_page", self.per_page)
            .query("order_by", self.order_by.as_deref());
    }

    pub(crate) fn at(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }
}

/// A page of a v2 list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<R> {
    /// Total number of results across all pages
    #[serde(default)]
    pub total_results: Option<u32>,
    /// Total number of pages
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Relative URL of the previous page
    #[serde(default)]
    pub prev_url: Option<String>,
    /// Relative URL of the next page
    #[serde(default)]
    pub next_url: Option<String>,
    /// The resources on this page
    #[serde(default = "Vec::new")]
    pub resources: Vec<R>,
}

impl<R> Page for ListResponse<R> {
    type Resource = R;

    fn total_pages(&self) -> u32 {
        self.total_pages.unwrap_or(0)
    }

    fn into_resources(self) -> Vec<R> {
        self.resources
    }
}

/// A hyperlink in a v3 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL
    pub href: String,
    /// HTTP method, when not GET
    #[serde(default)]
    pub method: Option<String>,
}

/// Pagination metadata of a v3 list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of results across all pages
    #[serde(default)]
    pub total_results: Option<u32>,
    /// Total number of pages
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// First page
    #[serde(default)]
    pub first: Option<Link>,
    /// Last page
    #[serde(default)]
    pub last: Option<Link>,
    /// Next page
    #[serde(default)]
    pub next: Option<Link>,
    /// Previous page
    #[serde(default)]
    pub previous: Option<Link>,
}

/// A page of a v3 list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<R> {
    /// Pagination metadata
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// The resources on this page
    #[serde(default = "Vec::new")]
    pub resources: Vec<R>,
}

impl<R> Page for PaginatedResponse<R> {
    type Resource = R;

    fn total_pages(&self) -> u32 {
        self.pagination
            .as_ref()
            .and_then(|p| p.total_pages)
            .unwrap_or(0)
    }

    fn into_resources(self) -> Vec<R> {
        self.resources
    }
}
