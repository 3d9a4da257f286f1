//! Refreshing authorization session.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::{Mutex, RwLock};

use super::{AuthorizationProvider, Credential};
use crate::{Error, Result};

/// Obtains a fresh credential, typically with a network round-trip.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a new credential.
    async fn fetch(&self) -> Result<Credential>;
}

/// Authorization session backed by a [`TokenSource`].
///
/// The first request, and any request made while the current credential
/// expires within the refresh buffer, triggers a refresh. At most one
/// refresh runs at a time: requests that arrive while a refresh is in
/// flight wait for it and receive its outcome, credential or error,
/// without fetching again.
///
/// # Thread Safety
///
/// `Session` is cheap to clone and designed to be shared across tasks;
/// clones share the same credential.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    source: Arc<dyn TokenSource>,
    state: RwLock<State>,
    refresh_lock: Mutex<()>,
    refresh_buffer: Duration,
}

/// Outcome of the most recent refresh.
#[derive(Default)]
struct State {
    /// Bumped by every completed refresh, successful or not.
    generation: u64,
    current: Option<Arc<Credential>>,
    failure: Option<Error>,
}

impl State {
    fn fresh(&self, buffer: Duration) -> Option<Arc<Credential>> {
        self.current
            .as_ref()
            .filter(|c| !c.expires_within(buffer))
            .cloned()
    }

    fn outcome(&self) -> Option<Result<Arc<Credential>>> {
        match (&self.failure, &self.current) {
            (Some(e), _) => Some(Err(e.clone())),
            (None, Some(credential)) => Some(Ok(credential.clone())),
            (None, None) => None,
        }
    }
}

impl Session {
    /// Default time before expiry at which a credential is refreshed.
    pub const DEFAULT_REFRESH_BUFFER_SECS: i64 = 60;

    /// Create a session. No token is fetched until first use.
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self::with_refresh_buffer(source, Duration::seconds(Self::DEFAULT_REFRESH_BUFFER_SECS))
    }

    /// Create a session that refreshes credentials `buffer` before expiry.
    pub fn with_refresh_buffer(source: Arc<dyn TokenSource>, buffer: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                source,
                state: RwLock::new(State::default()),
                refresh_lock: Mutex::new(()),
                refresh_buffer: buffer,
            }),
        }
    }

    /// Discard the current credential so the next request refreshes.
    pub async fn invalidate(&self) {
        let mut state = self.inner.state.write().await;
        state.current = None;
        state.failure = None;
    }

    /// Fetch a new credential now, regardless of the current one.
    pub async fn refresh(&self) -> Result<Arc<Credential>> {
        let _guard = self.inner.refresh_lock.lock().await;
        self.fetch_and_store().await
    }

    async fn fetch_and_store(&self) -> Result<Arc<Credential>> {
        tracing::debug!("refreshing credential");
        let result = self.inner.source.fetch().await.map(Arc::new);

        let mut state = self.inner.state.write().await;
        state.generation += 1;
        match &result {
            Ok(credential) => {
                tracing::debug!(expires_at = ?credential.expires_at(), "credential refreshed");
                state.current = Some(credential.clone());
                state.failure = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "credential refresh failed");
                state.failure = Some(e.clone());
            }
        }
        result
    }
}

#[async_trait]
impl AuthorizationProvider for Session {
    async fn authorization(&self) -> Result<Arc<Credential>> {
        let seen = {
            let state = self.inner.state.read().await;
            if let Some(credential) = state.fresh(self.inner.refresh_buffer) {
                return Ok(credential);
            }
            state.generation
        };

        let _guard = self.inner.refresh_lock.lock().await;

        // A refresh completed while waiting for the lock: share its outcome,
        // even if the new credential is already inside the refresh buffer.
        {
            let state = self.inner.state.read().await;
            if state.generation != seen {
                if let Some(outcome) = state.outcome() {
                    return outcome;
                }
            }
        }

        self.fetch_and_store().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_buffer", &self.inner.refresh_buffer)
            .finish()
    }
}
