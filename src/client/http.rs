//! HTTP client implementation for the Cloud Foundry API.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::api::{
    ApplicationsService, BuildpacksService, DomainsService, EventsService, TasksService,
};
use crate::auth::{AuthorizationProvider, Session, TokenGrant, UaaTokenSource};
use crate::error::translate;
use crate::models::Info;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::paginated::{paginate, Page, PaginatedRequest, PaginatedStream};
use super::params::{build_uri, ApiRequest};

/// The main client for interacting with the Cloud Foundry API.
///
/// The client owns the HTTP transport and the authorization provider, and
/// hands out per-endpoint services that share them.
///
/// # Example
///
/// ```no_run
/// use cloudfoundry_rs::{CloudFoundryClient, ClientConfig};
/// use cloudfoundry_rs::api::ApplicationRequest;
/// use cloudfoundry_rs::auth::TokenGrant;
///
/// # async fn example() -> cloudfoundry_rs::Result<()> {
/// let client = CloudFoundryClient::connect(
///     ClientConfig::new("https://api.run.example.com"),
///     TokenGrant::password("admin", "secret"),
/// ).await?;
///
/// let app = client
///     .applications()
///     .get(&ApplicationRequest::new("a7c47787-a982-467c-95d7-9ab17cbcc918"))
///     .await?;
/// println!("{} is {:?}", app.entity.name, app.entity.state);
/// # Ok(())
/// # }
/// ```
pub struct CloudFoundryClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) root: Url,
    pub(crate) auth: Arc<dyn AuthorizationProvider>,
    pub(crate) config: ClientConfig,
}

impl CloudFoundryClient {
    /// Create a client that authorizes requests with `auth`.
    pub fn new(config: ClientConfig, auth: Arc<dyn AuthorizationProvider>) -> Result<Self> {
        let root = config.root_url()?;
        let http = config.http_client()?;
        Ok(Self::from_parts(config, root, http, auth))
    }

    fn from_parts(
        config: ClientConfig,
        root: Url,
        http: reqwest::Client,
        auth: Arc<dyn AuthorizationProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                root,
                auth,
                config,
            }),
        }
    }

    /// Create a client that obtains tokens from the UAA server advertised
    /// by the cloud controller's `/v2/info` endpoint.
    pub async fn connect(config: ClientConfig, grant: TokenGrant) -> Result<Self> {
        let root = config.root_url()?;
        let refresh_buffer = config.refresh_buffer()?;
        let http = config.http_client()?;

        let info = fetch_info(&http, &root).await?;
        tracing::debug!(token_endpoint = %info.token_endpoint, "discovered token endpoint");

        let source = UaaTokenSource::new(
            http.clone(),
            &info.token_endpoint,
            config.client_id.clone(),
            config.client_secret.expose_secret(),
            grant,
        )?;
        let session = Session::with_refresh_buffer(Arc::new(source), refresh_buffer);

        Ok(Self::from_parts(config, root, http, Arc::new(session)))
    }

    /// Fetch the public description of the cloud controller.
    pub async fn info(&self) -> Result<Info> {
        fetch_info(&self.inner.http, &self.inner.root).await
    }

    /// Get the applications service.
    pub fn applications(&self) -> ApplicationsService {
        ApplicationsService::new(self.inner.clone())
    }

    /// Get the buildpacks service.
    pub fn buildpacks(&self) -> BuildpacksService {
        BuildpacksService::new(self.inner.clone())
    }

    /// Get the domains service.
    pub fn domains(&self) -> DomainsService {
        DomainsService::new(self.inner.clone())
    }

    /// Get the audit events service.
    pub fn events(&self) -> EventsService {
        EventsService::new(self.inner.clone())
    }

    /// Get the tasks service.
    pub fn tasks(&self) -> TasksService {
        TasksService::new(self.inner.clone())
    }

    /// The root URL of the API.
    pub fn root(&self) -> &Url {
        &self.inner.root
    }
}

impl ClientInner {
    /// Resolve the URI, attach the credential, and start a request.
    async fn authorized<Q: ApiRequest + ?Sized>(
        &self,
        method: Method,
        template: &str,
        request: &Q,
    ) -> Result<RequestBuilder> {
        let url = build_uri(&self.root, template, request)?;
        let credential = self.auth.authorization().await?;

        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, credential.header_value()?)
            .header(ACCEPT, "application/json"))
    }

    /// Perform an exchange and decode the JSON response body.
    pub(crate) async fn execute<Q, T>(&self, method: Method, template: &str, request: &Q) -> Result<T>
    where
        Q: ApiRequest + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.authorized(method, template, request).await?;
        decode(send(builder).await?).await
    }

    /// Perform an exchange with a JSON request body.
    pub(crate) async fn execute_with_body<Q, B, T>(
        &self,
        method: Method,
        template: &str,
        request: &Q,
        body: &B,
    ) -> Result<T>
    where
        Q: ApiRequest + ?Sized,
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let encoded = serde_json::to_vec(body).map_err(|e| Error::Decode {
            message: format!("failed to encode request body: {e}"),
            body: None,
        })?;

        let builder = self
            .authorized(method, template, request)
            .await?
            .header(CONTENT_TYPE, "application/json")
            .body(encoded);
        decode(send(builder).await?).await
    }

    /// Perform an exchange whose success carries no meaningful body.
    pub(crate) async fn execute_empty<Q>(&self, method: Method, template: &str, request: &Q) -> Result<()>
    where
        Q: ApiRequest + ?Sized,
    {
        let builder = self.authorized(method, template, request).await?;
        send(builder).await?;
        Ok(())
    }

    /// Perform an exchange and hand back the live response, for binary or
    /// streamed payloads.
    pub(crate) async fn execute_raw<Q>(&self, method: Method, template: &str, request: &Q) -> Result<Response>
    where
        Q: ApiRequest + ?Sized,
    {
        let builder = self.authorized(method, template, request).await?;
        send(builder).await
    }

    /// Perform an exchange with a multipart request body.
    pub(crate) async fn execute_multipart<Q, T>(
        &self,
        method: Method,
        template: &str,
        request: &Q,
        form: Form,
    ) -> Result<T>
    where
        Q: ApiRequest + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .authorized(method, template, request)
            .await?
            .multipart(form);
        decode(send(builder).await?).await
    }

    /// Stream every resource of a paginated listing.
    pub(crate) fn paginate<Q, P>(self: &Arc<Self>, template: impl Into<String>, request: Q) -> PaginatedStream<P::Resource>
    where
        Q: ApiRequest + PaginatedRequest + Send + Sync + 'static,
        P: Page + DeserializeOwned + Send + 'static,
        P::Resource: Send + 'static,
    {
        let inner = Arc::clone(self);
        let template: String = template.into();
        let template: Arc<str> = Arc::from(template);

        paginate(move |page| {
            let inner = inner.clone();
            let template = template.clone();
            let request = request.with_page(page);

            async move {
                inner
                    .execute::<Q, P>(Method::GET, &template, &request)
                    .await
            }
        })
    }
}

/// Send a request; non-2xx responses become errors.
pub(crate) async fn send(builder: RequestBuilder) -> Result<Response> {
    let (client, request) = builder.build_split();
    let request = request?;

    let method = request.method().clone();
    let url = request.url().clone();
    tracing::debug!(%method, %url, "sending request");

    let response = client.execute(request).await.map_err(|e| {
        tracing::debug!(%method, %url, error = %e, "request failed");
        Error::from(e)
    })?;

    let status = response.status();
    tracing::debug!(%method, %url, %status, "received response");

    if status.is_success() {
        return Ok(response);
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(%method, %url, %status, error = %e, "failed to read error body");
            Default::default()
        }
    };
    Err(translate(status.as_u16(), &body))
}

/// Decode a JSON response body.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
        message: e.to_string(),
        body: Some(String::from_utf8_lossy(&bytes).into_owned()),
    })
}

async fn fetch_info(http: &reqwest::Client, root: &Url) -> Result<Info> {
    let url = build_uri(root, "/v2/info", &())?;
    let response = send(http.get(url).header(ACCEPT, "application/json")).await?;
    decode(response).await
}

impl Clone for CloudFoundryClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for CloudFoundryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudFoundryClient")
            .field("root", &self.inner.root.as_str())
            .field("config", &self.inner.config)
            .finish()
    }
}
