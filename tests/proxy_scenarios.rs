//! End-to-end request handling against an in-process upstream.

mod common;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use common::RecordingClient;
use edge_proxy::upstream::UpstreamResponse;
use edge_proxy::{HttpServer, ProxyConfig};

fn router(config: ProxyConfig, client: RecordingClient) -> Router {
    HttpServer::with_client(config, client).unwrap().router()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn subdomain_route_relays_upstream_response() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let response = app.oneshot(get("/games/v1/list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    let seen = client.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].target().as_str(), "https://games.roblox.com/v1/list");
    assert_eq!(*seen[0].method(), Method::GET);
}

#[tokio::test]
async fn query_string_reaches_upstream() {
    let client = RecordingClient::responding(200, "{}");
    let app = router(ProxyConfig::default(), client.clone());

    app.oneshot(get("/users/v1/users/1?limit=10")).await.unwrap();
    assert_eq!(
        client.requests()[0].target().as_str(),
        "https://users.roblox.com/v1/users/1?limit=10"
    );
}

#[tokio::test]
async fn pinned_route_goes_to_fixed_host() {
    let client = RecordingClient::responding(200, "reported");
    let mut config = ProxyConfig::default();
    config.upstream.self_host = Some("www.roblox.com".into());
    let app = router(config, client.clone());

    let response = app.oneshot(get("/ca-1394-report/submit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        client.requests()[0].target().as_str(),
        "https://www.roblox.com/ca-1394-report/submit"
    );
}

#[tokio::test]
async fn unmappable_path_is_rejected_without_upstream_call() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let response = app.oneshot(get("/badpath")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "URL format invalid.");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn root_path_is_rejected() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn unreachable_upstream_exhausts_retries() {
    let client = RecordingClient::unreachable();
    let mut config = ProxyConfig::default();
    config.retries.max_retries = 2;
    let app = router(config, client.clone());

    let response = app.oneshot(get("/games/v1/list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Proxy failed to connect. Please try again."
    );
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn upstream_error_status_is_relayed_not_retried() {
    let client = RecordingClient::responding(503, "busy");
    let app = router(ProxyConfig::default(), client.clone());

    let response = app.oneshot(get("/games/v1/list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "busy");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn missing_or_wrong_key_is_rejected() {
    let client = RecordingClient::responding(200, "OK");
    let mut config = ProxyConfig::default();
    config.access.secret = Some("s3cret".into());
    let app = router(config, client.clone());

    let response = app.clone().oneshot(get("/games/v1/list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::PROXY_AUTHENTICATION_REQUIRED);
    assert_eq!(body_text(response).await, "Missing or invalid proxy key.");

    let wrong = Request::builder()
        .uri("/games/v1/list")
        .header("PROXYKEY", "guess")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(wrong).await.unwrap();
    assert_eq!(response.status(), StatusCode::PROXY_AUTHENTICATION_REQUIRED);

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn gate_runs_before_path_mapping() {
    let client = RecordingClient::responding(200, "OK");
    let mut config = ProxyConfig::default();
    config.access.secret = Some("s3cret".into());
    let app = router(config, client);

    let response = app.oneshot(get("/badpath")).await.unwrap();
    assert_eq!(response.status(), StatusCode::PROXY_AUTHENTICATION_REQUIRED);
}

#[tokio::test]
async fn correct_key_is_admitted_and_forwarded() {
    let client = RecordingClient::responding(200, "OK");
    let mut config = ProxyConfig::default();
    config.access.secret = Some("s3cret".into());
    let app = router(config, client.clone());

    let request = Request::builder()
        .uri("/games/v1/list")
        .header("PROXYKEY", "s3cret")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn identity_headers_are_rewritten() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let request = Request::builder()
        .uri("/games/v1/list")
        .header(header::USER_AGENT, "curl/8.0")
        .header("Roblox-Id", "12345")
        .header(header::COOKIE, ".ROBLOSECURITY=abc")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap();

    let seen = client.requests();
    let headers = seen[0].headers();
    assert_eq!(headers[header::USER_AGENT], "RoProxy");
    assert!(headers.get("roblox-id").is_none());
    assert_eq!(headers[header::COOKIE], ".ROBLOSECURITY=abc");
}

#[tokio::test]
async fn request_body_is_forwarded() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/v2/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"user":"a"}"#))
        .unwrap();
    app.oneshot(request).await.unwrap();

    let seen = client.requests();
    assert_eq!(*seen[0].method(), Method::POST);
    assert_eq!(seen[0].body().as_ref(), br#"{"user":"a"}"#);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let client = RecordingClient::responding(200, "OK");
    let mut config = ProxyConfig::default();
    config.listener.max_body_bytes = 8;
    let app = router(config, client.clone());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/games/v1/list")
        .body(Body::from("this body is far too long"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_text(response).await, "Request body too large.");
    assert_eq!(client.calls(), 0);
}

fn header_names(headers: &HeaderMap) -> Vec<String> {
    let mut names: Vec<String> = headers.keys().map(|k| k.as_str().to_string()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn outbound_headers_are_exactly_the_filtered_inbound_set() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let request = Request::builder()
        .uri("/games/v1/list")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap();

    let seen = client.requests();
    assert_eq!(header_names(seen[0].headers()), vec!["accept", "user-agent"]);
}

#[tokio::test]
async fn response_headers_are_exactly_the_upstream_set() {
    let mut headers = HeaderMap::new();
    headers.insert("x-up", HeaderValue::from_static("1"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("2"));
    let client = RecordingClient::replying(UpstreamResponse {
        status: StatusCode::OK,
        headers,
        body: Bytes::from_static(b"OK"),
    });
    let app = router(ProxyConfig::default(), client);

    let response = app.oneshot(get("/games/v1/list")).await.unwrap();
    assert_eq!(header_names(response.headers()), vec!["content-length", "x-up"]);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "2");
}

#[tokio::test]
async fn head_response_keeps_upstream_length() {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("1234"));
    let client = RecordingClient::replying(UpstreamResponse {
        status: StatusCode::OK,
        headers,
        body: Bytes::new(),
    });
    let app = router(ProxyConfig::default(), client.clone());

    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/thumbnails/v1/assets")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "1234");
    assert_eq!(*client.requests()[0].method(), Method::HEAD);
}

#[tokio::test]
async fn caller_request_id_is_forwarded_not_echoed() {
    let client = RecordingClient::responding(200, "OK");
    let app = router(ProxyConfig::default(), client.clone());

    let request = Request::builder()
        .uri("/games/v1/list")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().get("x-request-id").is_none());
    assert_eq!(client.requests()[0].headers()["x-request-id"], "trace-me");
}
