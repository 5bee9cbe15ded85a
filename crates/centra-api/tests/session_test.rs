// Integration tests for `Session` using wiremock.
#![allow(clippy::unwrap_used)]

use std::pin::pin;
use std::sync::Arc;

use futures_util::{StreamExt, TryStreamExt};
use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request as MockRequest, Respond, ResponseTemplate};

use centra_api::{
    Attachment, AuthState, Error, PageRequest, Request, Session, SessionConfig, TwoFactorPrompt,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config() -> SessionConfig {
    SessionConfig {
        management_address: "centra.test".into(),
        username: "admin".into(),
        password: Some("secret".to_owned().into()),
        ..SessionConfig::default()
    }
}

fn offline_config() -> SessionConfig {
    SessionConfig {
        login: false,
        ..config()
    }
}

async fn connect(server: &MockServer, config: SessionConfig) -> Result<Session, Error> {
    Session::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        config,
    )
    .await
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": token })))
        .mount(server)
        .await;
}

fn json_error() -> Value {
    json!({ "error": "foo", "description": "bar" })
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_and_sends_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .and(header("authorization", "bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, config()).await.unwrap();
    assert_eq!(session.auth_state(), AuthState::Succeeded);
    assert!(!session.two_factor_required());
    assert_eq!(session.access_token().unwrap().expose_secret(), "tok");

    let body = session.query(Request::get("/assets")).await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_login_false_issues_no_requests() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;

    let session = connect(&server, offline_config()).await.unwrap();
    assert_eq!(request_count(&server).await, 0);
    assert_eq!(session.auth_state(), AuthState::Unknown);
    assert!(session.access_token().is_none());

    session.login().await.unwrap();
    assert_eq!(request_count(&server).await, 1);
    assert_eq!(session.auth_state(), AuthState::Succeeded);
}

#[tokio::test]
async fn test_failed_login_produces_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json_error()))
        .mount(&server)
        .await;

    let err = connect(&server, config()).await.err().unwrap();
    assert!(err.is_authentication());
    assert!(err.to_string().contains("foo: bar"));
}

#[tokio::test]
async fn test_missing_password_fails_before_any_request() {
    let server = MockServer::start().await;
    let session = connect(
        &server,
        SessionConfig {
            password: None,
            ..offline_config()
        },
    )
    .await
    .unwrap();

    let err = session.login().await.unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(session.auth_state(), AuthState::Failed);
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_unrecognized_login_response_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hello": "world" })))
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    assert!(session.login().await.unwrap_err().is_authentication());
    assert_eq!(session.auth_state(), AuthState::Failed);
}

// ── Two-factor ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_two_factor_flow_submits_code_and_temp_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "2fa_required": true, "2fa_temp_token": "T" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .and(body_json(json!({
            "username": "admin",
            "password": "123456",
            "two_factor_auth_phase": 1,
            "temp_token": "T"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok2" })))
        .expect(1)
        .mount(&server)
        .await;

    let prompt: Arc<dyn TwoFactorPrompt> = Arc::new(|user: &str| {
        assert_eq!(user, "admin");
        "123456".to_owned()
    });
    let session = connect(
        &server,
        SessionConfig {
            allow_two_factor_auth: true,
            two_factor_prompt: Some(prompt),
            ..config()
        },
    )
    .await
    .unwrap();

    assert!(session.two_factor_required());
    assert_eq!(session.auth_state(), AuthState::Succeeded);
    assert_eq!(session.access_token().unwrap().expose_secret(), "tok2");
}

#[tokio::test]
async fn test_two_factor_not_allowed_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "2fa_required": true, "2fa_temp_token": "T" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let err = session.login().await.unwrap_err();
    assert!(err.is_authentication());
    assert!(session.two_factor_required());
    assert_eq!(session.auth_state(), AuthState::Failed);
    assert!(session.access_token().is_none());
}

// ── Response classification ─────────────────────────────────────────

#[tokio::test]
async fn test_error_statuses_map_to_taxonomy() {
    let server = MockServer::start().await;
    let cases: [(&str, u16, Option<Value>); 6] = [
        ("unauthorized", 401, Some(json_error())),
        ("forbidden", 403, Some(json_error())),
        ("missing", 404, None),
        ("slow", 504, None),
        ("broken", 500, Some(json_error())),
        ("conflict", 409, Some(json_error())),
    ];
    for (endpoint, status, body) in &cases {
        let template = match body {
            Some(body) => ResponseTemplate::new(*status).set_body_json(body),
            None => ResponseTemplate::new(*status).set_body_string("<html>nope</html>"),
        };
        Mock::given(path(format!("/api/v3.0/{endpoint}")))
            .respond_with(template)
            .mount(&server)
            .await;
    }

    let session = connect(&server, offline_config()).await.unwrap();
    session.set_token("tok".to_owned());

    let query = |endpoint: &'static str| session.query(Request::get(endpoint));

    let err = query("unauthorized").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { ref message } if message == "foo: bar"));

    let err = query("forbidden").await.unwrap_err();
    assert!(matches!(err, Error::Permission { ref message } if message == "foo: bar"));

    assert!(matches!(query("missing").await, Err(Error::BadRequest { .. })));
    assert!(matches!(query("slow").await, Err(Error::RequestTimeout { .. })));

    for (endpoint, code) in [("broken", 500), ("conflict", 409)] {
        match query(endpoint).await.unwrap_err() {
            Error::Api { message, status } => {
                assert!(message.contains("foo") && message.contains("bar"));
                assert_eq!(status, Some(code));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_body_parsing() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    Mock::given(path("/api/v3.0/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();

    let err = session.query(Request::get("garbled")).await.unwrap_err();
    assert!(matches!(err, Error::Api { ref message, .. } if message.contains("not json")));

    let raw = session.query_bytes(Request::get("garbled")).await.unwrap();
    assert_eq!(&raw[..], b"not json");

    assert_eq!(session.query(Request::get("empty")).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_unsupported_method_is_rejected_without_io() {
    let server = MockServer::start().await;
    let session = connect(&server, offline_config()).await.unwrap();

    let err = session
        .query(Request::new(Method::OPTIONS, "assets"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest { .. }));
    assert_eq!(request_count(&server).await, 0);
}

// ── Auto-reconnect ──────────────────────────────────────────────────

#[tokio::test]
async fn test_auth_failure_triggers_one_relogin_and_one_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "old" })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "new" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .and(header("authorization", "bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .and(header("authorization", "bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "objects": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, config()).await.unwrap();
    let body = session.query(Request::get("assets")).await.unwrap();
    assert_eq!(body, json!({ "objects": [] }));
    assert_eq!(session.auth_state(), AuthState::Succeeded);
}

#[tokio::test]
async fn test_second_auth_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json_error()))
        .expect(2)
        .mount(&server)
        .await;

    let session = connect(&server, config()).await.unwrap();
    let err = session.query(Request::get("assets")).await.unwrap_err();
    assert!(err.is_authentication());
}

#[tokio::test]
async fn test_no_reconnect_without_prior_successful_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json_error()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json_error()))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    assert!(session.login().await.is_err());
    assert!(session.query(Request::get("assets")).await.is_err());
}

#[tokio::test]
async fn test_no_reconnect_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json_error()))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(
        &server,
        SessionConfig {
            auto_reconnect: false,
            ..config()
        },
    )
    .await
    .unwrap();
    assert!(session.query(Request::get("assets")).await.is_err());
}

#[tokio::test]
async fn test_set_token_swaps_header_without_touching_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .and(header("authorization", "bearer manual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    session.set_token("manual".to_owned());
    session.set_token("manual".to_owned());
    assert_eq!(session.auth_state(), AuthState::Unknown);
    session.query(Request::get("assets")).await.unwrap();
}

// ── Redirects ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_406_with_location_is_followed_transparently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/foo"))
        .respond_with(ResponseTemplate::new(406).insert_header("Location", "bar"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/bar"))
        .and(query_param("status", "on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "final": true })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let body = session
        .query(Request::get("foo").param("status", "on"))
        .await
        .unwrap();
    assert_eq!(body, json!({ "final": true }));
}

#[tokio::test]
async fn test_base_path_prefix_is_stripped_from_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/old"))
        .respond_with(ResponseTemplate::new(406).insert_header("Location", "/api/v3.0/new"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/new"))
        .and(body_json(json!({ "vms": ["a"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "l-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let body = session
        .query(Request::post("old").json_value(json!({ "vms": ["a"] })))
        .await
        .unwrap();
    assert_eq!(body["id"], "l-1");
}

#[tokio::test]
async fn test_redirect_disabled_raises_without_follow_up() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/foo"))
        .respond_with(ResponseTemplate::new(406).insert_header("Location", "bar"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/v3.0/bar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = connect(
        &server,
        SessionConfig {
            follow_redirects: false,
            ..offline_config()
        },
    )
    .await
    .unwrap();
    let err = session.query(Request::get("foo")).await.unwrap_err();
    assert!(matches!(err, Error::RedirectionRequired { .. }));
}

#[tokio::test]
async fn test_406_without_location_requires_redirection() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/foo"))
        .respond_with(ResponseTemplate::new(406))
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let err = session.query(Request::get("foo")).await.unwrap_err();
    assert!(matches!(err, Error::RedirectionRequired { .. }));
}

#[tokio::test]
async fn test_max_redirects_caps_redirect_loops() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/loop"))
        .respond_with(ResponseTemplate::new(406).insert_header("Location", "loop"))
        .expect(4)
        .mount(&server)
        .await;

    let session = connect(
        &server,
        SessionConfig {
            max_redirects: Some(3),
            ..offline_config()
        },
    )
    .await
    .unwrap();
    let err = session.query(Request::get("loop")).await.unwrap_err();
    assert!(matches!(err, Error::RedirectionRequired { .. }));
}

// ── Pagination ──────────────────────────────────────────────────────

/// Serves `total` objects one per page, with `to = offset + 1`.
struct OnePerPage {
    total: u64,
}

impl Respond for OnePerPage {
    fn respond(&self, request: &MockRequest) -> ResponseTemplate {
        let offset = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "offset")
            .map_or(0, |(_, v)| v.parse::<u64>().unwrap());
        ResponseTemplate::new(200).set_body_json(json!({
            "objects": [{ "id": format!("asset-{offset}") }],
            "total_count": self.total,
            "results_in_page": 1,
            "to": offset + 1,
        }))
    }
}

fn offsets(requests: &[MockRequest]) -> Vec<Option<String>> {
    requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}

#[tokio::test]
async fn test_paginate_yields_page_count_pages_chained_by_to() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/assets"))
        .and(query_param("status", "on"))
        .respond_with(OnePerPage { total: 5 })
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let pages: Vec<_> = session
        .paginate(PageRequest::new("assets").objects_per_page(1).param("status", "on"))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pages.len(), 5);
    assert_eq!(pages[4].objects[0]["id"], "asset-4");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        offsets(&requests),
        vec![
            None,
            Some("1".into()),
            Some("2".into()),
            Some("3".into()),
            Some("4".into())
        ]
    );
    assert!(requests.iter().all(|r| r.url.query_pairs().any(|(k, v)| k == "limit" && v == "1")));
}

#[tokio::test]
async fn test_first_page_request_omits_limit_without_page_size() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/assets"))
        .and(query_param_is_missing("limit"))
        .respond_with(OnePerPage { total: 1 })
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let pages: Vec<_> = session
        .paginate(PageRequest::new("assets"))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn test_pages_are_fetched_only_when_polled() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/assets"))
        .respond_with(OnePerPage { total: 5 })
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let mut pages = pin!(session.paginate(PageRequest::new("assets")));
    assert_eq!(request_count(&server).await, 0);

    pages.next().await.unwrap().unwrap();
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_paginate_objects_flattens_and_stops_after_limit() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/assets"))
        .respond_with(OnePerPage { total: 5 })
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let objects: Vec<Value> = session
        .paginate_objects(PageRequest::new("assets").stop_after(2))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(objects, vec![json!({ "id": "asset-0" }), json!({ "id": "asset-1" })]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_page_errors_end_the_stream() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/assets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json_error()))
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let result: Result<Vec<_>, _> = session
        .paginate(PageRequest::new("assets"))
        .try_collect()
        .await;
    assert!(matches!(result, Err(Error::Permission { .. })));
}

#[tokio::test]
async fn test_page_without_cursor_is_not_refetched() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [{ "id": "asset-0" }],
            "total_count": 3,
            "results_in_page": 1,
        })))
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let result: Result<Vec<_>, _> = session
        .paginate(PageRequest::new("assets").objects_per_page(1))
        .try_collect()
        .await;

    match result {
        Err(Error::Deserialization { message, .. }) => assert!(message.contains("`to`")),
        other => panic!("expected a deserialization error, got {other:?}"),
    }
    assert_eq!(request_count(&server).await, 1);
}

// ── Uploads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_attachments_are_sent_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uploaded": true })))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    let request = Request::post("upload")
        .json_value(json!({ "description": "agents" }))
        .attach(Attachment {
            field: "file".into(),
            file_name: "agents.csv".into(),
            content: bytes::Bytes::from_static(b"name\nweb-01\n"),
            mime: Some("text/csv".into()),
        });
    session.query(request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("agents.csv"));
    assert!(body.contains("name=\"description\""));
}

// ── Connectivity & teardown ─────────────────────────────────────────

#[tokio::test]
async fn test_is_connected_reflects_status_endpoint() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v3.0/system-notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "notifications": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/v3.0/system-notifications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json_error()))
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    assert!(session.is_connected().await);
    assert!(!session.is_connected().await);
}

#[tokio::test]
async fn test_close_swallows_api_errors() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json_error()))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, config()).await.unwrap();
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_logout_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3.0/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bye"))
        .expect(1)
        .mount(&server)
        .await;

    let session = connect(&server, offline_config()).await.unwrap();
    session.logout().await.unwrap();
}

#[tokio::test]
async fn test_close_returns_transport_errors() {
    let session = Session::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1/").unwrap(),
        offline_config(),
    )
    .await
    .unwrap();

    let err = session.close().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

// ── Location ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_base_path_and_port_changes_move_requests() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v4.0/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "v": 4 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = connect(&server, offline_config()).await.unwrap();
    session.set_base_path("/api/v4.0/").unwrap();
    assert!(session.base_url().as_str().ends_with("/api/v4.0/"));
    assert_eq!(
        session.query(Request::get("assets")).await.unwrap(),
        json!({ "v": 4 })
    );

    session.set_port(9443).unwrap();
    assert_eq!(session.base_url().port(), Some(9443));
    assert_eq!(session.config().port, 9443);
}
