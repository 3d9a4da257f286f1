//! Integration tests for the request pipeline against a mock cloud controller.
//!
//! Every test runs against a local wiremock server; no network access or
//! credentials are needed.
//!
//! Run with: cargo test --test pipeline_tests
//! Set RUST_LOG=cloudfoundry_rs=debug to see the request log.

use std::sync::{Arc, Once};
use std::time::Duration;

use futures_util::{StreamExt, TryStreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudfoundry_rs::api::{
    ApplicationRequest, CreateTaskRequest, DeleteApplicationRequest, ListDomainsRequest,
    ListTasksRequest, UploadBuildpackRequest,
};
use cloudfoundry_rs::auth::{StaticToken, TokenGrant};
use cloudfoundry_rs::models::{PageQuery, TaskState};
use cloudfoundry_rs::{ClientConfig, CloudFoundryClient, Error, ErrorKind};

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn client(server: &MockServer) -> CloudFoundryClient {
    init_logging();
    CloudFoundryClient::new(
        ClientConfig::new(server.uri()),
        Arc::new(StaticToken::bearer("test-token")),
    )
    .unwrap()
}

fn domain(guid: &str) -> Value {
    json!({
        "metadata": {"guid": guid, "url": format!("/v2/domains/{guid}")},
        "entity": {"name": format!("{guid}.example.com"), "owning_organization_guid": null}
    })
}

fn domain_page(total_pages: u32, guids: &[&str]) -> Value {
    json!({
        "total_results": guids.len(),
        "total_pages": total_pages,
        "resources": guids.iter().map(|g| domain(g)).collect::<Vec<_>>()
    })
}

async fn mount_domain_page(server: &MockServer, page: u32, body: Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/v2/domains"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn task(guid: &str, state: &str) -> Value {
    json!({
        "guid": guid,
        "name": format!("task-{guid}"),
        "command": "echo hello",
        "state": state,
        "memory_in_mb": 256,
        "result": {"failure_reason": null},
        "links": {
            "self": {"href": format!("https://api.example.com/v3/tasks/{guid}")}
        }
    })
}

// =============================================================================
// Single exchanges
// =============================================================================

#[tokio::test]
async fn test_get_attaches_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1"))
        .and(header("authorization", "bearer test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"guid": "app-1"},
            "entity": {"name": "web", "space_guid": "space-1", "state": "STARTED", "instances": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = client(&server)
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap();

    assert_eq!(app.id(), "app-1");
    assert_eq!(app.entity.name, "web");
    assert_eq!(app.entity.instances, Some(2));
}

#[tokio::test]
async fn test_v2_error_becomes_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 100004,
            "description": "The app could not be found: missing",
            "error_code": "CF-AppNotFound"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications()
        .get(&ApplicationRequest::new("missing"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.is_not_found());
    match err {
        Error::Protocol {
            status,
            code,
            error_name,
            description,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, Some(100004));
            assert_eq!(error_name.as_deref(), Some("CF-AppNotFound"));
            assert_eq!(description, "The app could not be found: missing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unstructured_error_becomes_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), Some(502));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"metadata\": 42"))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    match err {
        Error::Decode { body, .. } => assert_eq!(body.as_deref(), Some("{\"metadata\": 42")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/apps/app-1"))
        .and(query_param("recursive", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .applications()
        .delete(&DeleteApplicationRequest {
            application_id: "app-1".into(),
            recursive: Some(true),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_download_returns_raw_response() {
    let server = MockServer::start().await;
    let bits: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff];
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(bits.clone()),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .applications()
        .download(&ApplicationRequest::new("app-1"))
        .await
        .unwrap();

    assert_eq!(response.bytes().await.unwrap().to_vec(), bits);
}

#[tokio::test]
async fn test_buildpack_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v2/buildpacks/bp-1/bits"))
        .and(body_string_contains("name=\"buildpack\""))
        .and(body_string_contains("filename=\"ruby_buildpack.zip\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "metadata": {"guid": "bp-1"},
            "entity": {"name": "ruby_buildpack", "position": 1, "filename": "ruby_buildpack.zip"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let buildpack = client(&server)
        .buildpacks()
        .upload(UploadBuildpackRequest::new(
            "bp-1",
            "ruby_buildpack.zip",
            b"PK\x03\x04".to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(buildpack.entity.filename.as_deref(), Some("ruby_buildpack.zip"));
}

#[tokio::test]
async fn test_validation_failure_sends_nothing() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client
        .applications()
        .get(&ApplicationRequest::new(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = client
        .tasks()
        .create(&CreateTaskRequest::new("app-1", ""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop a listener to get a port nothing is listening on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = CloudFoundryClient::new(
        ClientConfig::new(format!("http://127.0.0.1:{port}")),
        Arc::new(StaticToken::bearer("test-token")),
    )
    .unwrap();

    let err = client
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    init_logging();
    let client = CloudFoundryClient::new(
        ClientConfig::new(server.uri()).with_timeout(Duration::from_millis(100)),
        Arc::new(StaticToken::bearer("test-token")),
    )
    .unwrap();

    let err = client
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
    assert!(err.to_string().contains("timed out"), "{err}");
}

#[tokio::test]
async fn test_truncated_error_body_falls_back_to_status() {
    // A server that promises more body than it sends, then hangs up.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\n{\"code\"")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    init_logging();
    let client = CloudFoundryClient::new(
        ClientConfig::new(format!("http://{addr}")),
        Arc::new(StaticToken::bearer("test-token")),
    )
    .unwrap();

    let err = client
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Transport error: 500 Internal Server Error");
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_stream_walks_every_page_in_order() {
    let server = MockServer::start().await;
    mount_domain_page(&server, 1, domain_page(3, &["d1", "d2"]), 1).await;
    mount_domain_page(&server, 2, domain_page(3, &["d3", "d4"]), 1).await;
    mount_domain_page(&server, 3, domain_page(3, &["d5"]), 1).await;

    let domains: Vec<_> = client(&server)
        .domains()
        .list_stream(ListDomainsRequest::default())
        .try_collect()
        .await
        .unwrap();

    let guids: Vec<_> = domains.iter().map(|d| d.id()).collect();
    assert_eq!(guids, ["d1", "d2", "d3", "d4", "d5"]);
}

#[tokio::test]
async fn test_stream_keeps_filters_on_every_page() {
    let server = MockServer::start().await;
    for page in 1..=2 {
        Mock::given(method("GET"))
            .and(path("/v2/domains"))
            .and(query_param("page", page.to_string()))
            .and(query_param("results-per-page", "2"))
            .and(query_param("q", "owning_organization_guid IN org-1,org-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(domain_page(2, &[format!("d{page}").as_str()])),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let request = ListDomainsRequest {
        owning_organization_ids: Some(vec!["org-1".into(), "org-2".into()]),
        page: PageQuery {
            results_per_page: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };

    let count = client(&server)
        .domains()
        .list_stream(request)
        .try_collect::<Vec<_>>()
        .await
        .unwrap()
        .len();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_stream_of_empty_listing() {
    let server = MockServer::start().await;
    mount_domain_page(&server, 1, domain_page(0, &[]), 1).await;

    let domains: Vec<_> = client(&server)
        .domains()
        .list_stream(ListDomainsRequest::default())
        .try_collect()
        .await
        .unwrap();

    assert!(domains.is_empty());
}

#[tokio::test]
async fn test_stream_stops_at_failed_page() {
    let server = MockServer::start().await;
    mount_domain_page(&server, 1, domain_page(3, &["d1", "d2"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/domains"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 10001,
            "description": "An unknown error occurred.",
            "error_code": "CF-ServerError"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_domain_page(&server, 3, domain_page(3, &["d5"]), 0).await;

    let items: Vec<_> = client(&server)
        .domains()
        .list_stream(ListDomainsRequest::default())
        .collect()
        .await;

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap().id(), "d1");
    assert_eq!(items[1].as_ref().unwrap().id(), "d2");
    let err = items[2].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_stream_tolerates_inconsistent_total() {
    let server = MockServer::start().await;
    // Resources on a page that claims there are no pages at all.
    mount_domain_page(&server, 1, domain_page(0, &["d1"]), 1).await;
    mount_domain_page(&server, 2, domain_page(0, &["d2"]), 0).await;

    let domains: Vec<_> = client(&server)
        .domains()
        .list_stream(ListDomainsRequest::default())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(domains.len(), 1);
}

#[tokio::test]
async fn test_cancelled_stream_fetches_no_more_pages() {
    let server = MockServer::start().await;
    mount_domain_page(&server, 1, domain_page(2, &["d1", "d2"]), 1).await;
    mount_domain_page(&server, 2, domain_page(2, &["d3"]), 0).await;

    let token = CancellationToken::new();
    let mut stream = client(&server)
        .domains()
        .list_stream(ListDomainsRequest::default())
        .with_cancellation(token.clone());

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.id(), "d1");

    token.cancel();
    assert!(stream.next().await.is_none());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_dropped_stream_fetches_no_more_pages() {
    let server = MockServer::start().await;
    mount_domain_page(&server, 1, domain_page(2, &["d1", "d2"]), 1).await;
    mount_domain_page(&server, 2, domain_page(2, &["d3"]), 0).await;

    let mut stream = client(&server)
        .domains()
        .list_stream(ListDomainsRequest::default());
    stream.next().await.unwrap().unwrap();
    drop(stream);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}

// =============================================================================
// Tasks (v3)
// =============================================================================

#[tokio::test]
async fn test_create_task_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/apps/app-1/tasks"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"command": "rake db:migrate", "name": "migrate"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(task("t-1", "RUNNING")))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CreateTaskRequest::new("app-1", "rake db:migrate");
    request.name = Some("migrate".into());

    let task = client(&server).tasks().create(&request).await.unwrap();
    assert_eq!(task.guid, "t-1");
    assert_eq!(task.state, TaskState::Running);
    assert!(task.links.contains_key("self"));
}

#[tokio::test]
async fn test_v3_error_details_are_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/apps/app-1/tasks"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [
                {"code": 10008, "title": "CF-UnprocessableEntity", "detail": "memory_in_mb too large"},
                {"code": 10008, "title": "CF-UnprocessableEntity", "detail": "name is taken"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .tasks()
        .create(&CreateTaskRequest::new("app-1", "echo"))
        .await
        .unwrap_err();

    match err {
        Error::Protocol {
            status,
            code,
            error_name,
            description,
            ..
        } => {
            assert_eq!(status, 422);
            assert_eq!(code, Some(10008));
            assert_eq!(error_name.as_deref(), Some("CF-UnprocessableEntity"));
            assert_eq!(description, "memory_in_mb too large; name is taken");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_task_stream_uses_v3_pagination() {
    let server = MockServer::start().await;
    for (page, guid) in [(1, "t-1"), (2, "t-2")] {
        Mock::given(method("GET"))
            .and(path("/v3/tasks"))
            .and(query_param("page", page.to_string()))
            .and(query_param("states", "RUNNING,FAILED"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pagination": {
                    "total_results": 2,
                    "total_pages": 2,
                    "first": {"href": "https://api.example.com/v3/tasks?page=1"},
                    "last": {"href": "https://api.example.com/v3/tasks?page=2"},
                    "next": null,
                    "previous": null
                },
                "resources": [task(guid, "FAILED")]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let request = ListTasksRequest {
        states: Some(vec![TaskState::Running, TaskState::Failed]),
        ..Default::default()
    };
    let tasks: Vec<_> = client(&server)
        .tasks()
        .list_stream(request)
        .try_collect()
        .await
        .unwrap();

    let guids: Vec<_> = tasks.iter().map(|t| t.guid.as_str()).collect();
    assert_eq!(guids, ["t-1", "t-2"]);
    assert!(tasks.iter().all(|t| t.state.is_terminal()));
}

// =============================================================================
// UAA login
// =============================================================================

#[tokio::test]
async fn test_connect_discovers_uaa_and_shares_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "vcap",
            "api_version": "2.150.0",
            "authorization_endpoint": server.uri(),
            "token_endpoint": server.uri()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("authorization", "Basic Y2Y6"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "uaa-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "uaa-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1"))
        .and(header("authorization", "bearer uaa-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"guid": "app-1"},
            "entity": {"name": "web", "space_guid": "space-1"}
        })))
        .expect(3)
        .mount(&server)
        .await;

    init_logging();
    let client = CloudFoundryClient::connect(
        ClientConfig::new(server.uri()),
        TokenGrant::password("admin", "secret"),
    )
    .await
    .unwrap();

    let apps = client.applications();
    let request = ApplicationRequest::new("app-1");
    let (a, b, c) = tokio::join!(apps.get(&request), apps.get(&request), apps.get(&request));
    a.unwrap();
    b.unwrap();
    c.unwrap();
}

#[tokio::test]
async fn test_rejected_login_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_endpoint": server.uri()
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized",
            "error_description": "Bad credentials"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/app-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    init_logging();
    let client = CloudFoundryClient::connect(
        ClientConfig::new(server.uri()),
        TokenGrant::password("admin", "wrong"),
    )
    .await
    .unwrap();

    let err = client
        .applications()
        .get(&ApplicationRequest::new("app-1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Bad credentials"));
}
