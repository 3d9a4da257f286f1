//! Paginated stream for lazy iteration over list endpoints.
//!
//! [`paginate`] turns a page-fetch function into a [`PaginatedStream`] that
//! yields individual resources. Pages are requested one at a time: page
//! `n + 1` is only fetched once every resource of page `n` has been handed
//! to the consumer and page `n` reported that more pages exist.
//!
//! Dropping the stream drops any in-flight fetch. A walk can also be bound
//! to a [`CancellationToken`] with [`PaginatedStream::with_cancellation`].

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::Result;

/// Page numbering starts here.
pub const FIRST_PAGE: u32 = 1;

/// One deserialized list response.
pub trait Page {
    /// The element type of the list.
    type Resource;

    /// Total number of pages the server reports for this listing.
    fn total_pages(&self) -> u32;

    /// Consume the page, yielding its resources in server order.
    fn into_resources(self) -> Vec<Self::Resource>;
}

/// A request that can be re-issued for an arbitrary page.
pub trait PaginatedRequest {
    /// A copy of this request targeting `page`. The receiver is unchanged.
    fn with_page(&self, page: u32) -> Self;
}

/// The page that follows `current`, if the server reported one.
///
/// A page claiming to be past the last page (`current > total_pages`) is
/// treated as the last page.
pub fn next_page(current: u32, total_pages: u32) -> Option<u32> {
    if current > total_pages && current > FIRST_PAGE {
        tracing::warn!(
            current,
            total_pages,
            "page number exceeds reported total; ending pagination"
        );
    }
    if current < total_pages {
        Some(current + 1)
    } else {
        None
    }
}

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

struct FetchedPage<T> {
    total_pages: u32,
    resources: Vec<T>,
}

type FetchFn<T> = Box<dyn Fn(u32) -> BoxFuture<'static, Result<FetchedPage<T>>> + Send>;

/// A stream that lazily fetches pages from a paginated API endpoint.
///
/// Yields `Ok(resource)` for every resource of every page. If a page fetch
/// fails, the error is yielded once and the stream ends; resources already
/// yielded stay yielded.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use cloudfoundry_rs::api::ListDomainsRequest;
///
/// # async fn example(client: cloudfoundry_rs::CloudFoundryClient) -> cloudfoundry_rs::Result<()> {
/// let mut domains = client.domains().list_stream(ListDomainsRequest::default());
///
/// while let Some(domain) = domains.next().await {
///     println!("{}", domain?.entity.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream<T> {
    fetch_page: FetchFn<T>,
    buffer: VecDeque<T>,
    next_page: Option<u32>,
    pending: Option<(u32, BoxFuture<'static, Result<FetchedPage<T>>>)>,
    cancelled: Option<Pin<Box<WaitForCancellationFutureOwned>>>,
}

/// Aggregate every page produced by `fetch` into one stream.
///
/// `fetch` receives the 1-based page number to request.
pub fn paginate<F, Fut, P>(fetch: F) -> PaginatedStream<P::Resource>
where
    F: Fn(u32) -> Fut + Send + 'static,
    Fut: Future<Output = Result<P>> + Send + 'static,
    P: Page + Send + 'static,
    P::Resource: Send + 'static,
{
    PaginatedStream {
        fetch_page: Box::new(move |page| {
            let fut = fetch(page);
            Box::pin(async move {
                let page = fut.await?;
                Ok(FetchedPage {
                    total_pages: page.total_pages(),
                    resources: page.into_resources(),
                })
            })
        }),
        buffer: VecDeque::new(),
        next_page: Some(FIRST_PAGE),
        pending: None,
        cancelled: None,
    }
}

impl<T> PaginatedStream<T> {
    /// End the walk as soon as `token` is cancelled.
    ///
    /// Cancellation drops any in-flight fetch and any buffered resources,
    /// and the stream then ends without an error.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancelled = Some(Box::pin(token.cancelled_owned()));
        self
    }

    fn finish(&mut self) {
        self.buffer.clear();
        self.next_page = None;
        self.pending = None;
        self.cancelled = None;
    }
}

impl<T> Stream for PaginatedStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if let Some(cancelled) = this.cancelled.as_mut() {
            if cancelled.as_mut().poll(cx).is_ready() {
                tracing::debug!("pagination cancelled");
                this.finish();
                return Poll::Ready(None);
            }
        }

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some((page, fut)) = this.pending.as_mut() {
                let page = *page;
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(fetched)) => {
                        this.pending = None;
                        this.next_page = next_page(page, fetched.total_pages);
                        tracing::debug!(
                            page,
                            total_pages = fetched.total_pages,
                            resources = fetched.resources.len(),
                            "fetched page"
                        );
                        this.buffer.extend(fetched.resources);
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        tracing::debug!(page, error = %e, "page fetch failed");
                        this.finish();
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            match this.next_page.take() {
                Some(page) => {
                    let fut = (this.fetch_page)(page);
                    this.pending = Some((page, fut));
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

impl<T> Unpin for PaginatedStream<T> {}

impl<T> std::fmt::Debug for PaginatedStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedStream")
            .field("buffered", &self.buffer.len())
            .field("next_page", &self.next_page)
            .field("in_flight", &self.pending.as_ref().map(|(page, _)| *page))
            .finish()
    }
}
