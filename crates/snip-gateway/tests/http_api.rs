use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use jiff::{SignedDuration, Timestamp};
use serde_json::{json, Value};
use snip_gateway::{App, AppState, GatewayConfig};
use snip_storage::{InMemoryStore, RedisStore, ShortCode};
use snip_test_infra::redis::FakeRedis;
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:8080";

fn config(per_minute: u32) -> GatewayConfig {
    GatewayConfig::builder()
        .rate_limit_per_minute(NonZeroU32::new(per_minute).unwrap())
        .build()
}

fn memory_app() -> Router {
    let state = AppState::new(Arc::new(InMemoryStore::new()), BASE_URL);
    App::router(state, &config(1000))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn from_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn shorten(app: &Router, long_url: &str) -> String {
    let body = json!({ "long_url": long_url }).to_string();
    let response = send(app, post_json("/urls", &body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["short_url"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn create_returns_short_url() {
    let app = memory_app();

    assert_eq!(shorten(&app, "https://www.example.com").await, "http://localhost:8080/1");
    assert_eq!(shorten(&app, "https://www.example.com/2").await, "http://localhost:8080/2");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_not_doubled() {
    let state = AppState::new(Arc::new(InMemoryStore::new()), "https://sho.rt/");
    let app = App::router(state, &config(1000));

    assert_eq!(shorten(&app, "https://www.example.com").await, "https://sho.rt/1");
}

#[tokio::test]
async fn create_rejects_invalid_url() {
    let app = memory_app();

    for long_url in ["ftp://example.com", "invalid-url", ""] {
        let body = json!({ "long_url": long_url }).to_string();
        let response = send(&app, post_json("/urls", &body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{long_url}");
        assert_eq!(
            json_body(response).await["error"],
            "Invalid URL format. Must be http:// or https://"
        );
    }
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let app = memory_app();

    let response = send(&app, post_json("/urls", "{not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid JSON format");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn create_requires_json_content_type() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/urls")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"long_url":"https://example.com"}"#))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Content-Type must be application/json"
    );
}

#[tokio::test]
async fn create_accepts_json_with_charset() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/urls")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(r#"{"long_url":"https://example.com"}"#))
        .unwrap();

    assert_eq!(send(&app, request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn redirect_to_long_url() {
    let app = memory_app();
    shorten(&app, "https://www.example.com/target?q=1").await;

    let response = send(&app, get("/1")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://www.example.com/target?q=1"
    );
}

#[tokio::test]
async fn unknown_and_malformed_codes_are_not_found() {
    let app = memory_app();

    for uri in ["/nonexistent", "/abc", "/bad-code!"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json_body(response).await["error"], "Short URL not found");
    }
}

#[tokio::test]
async fn expired_code_is_not_found() {
    let app = memory_app();
    let past = Timestamp::now() - SignedDuration::from_hours(1);
    let body = json!({ "long_url": "https://example.com", "expiration_date": past }).to_string();
    assert_eq!(send(&app, post_json("/urls", &body)).await.status(), StatusCode::OK);

    assert_eq!(send(&app, get("/1")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&app, get("/urls/1/stats")).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_describe_the_record() {
    let app = memory_app();
    shorten(&app, "https://www.example.com/stats").await;

    let response = send(&app, get("/urls/1/stats")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["short_code"], "1");
    assert_eq!(body["long_url"], "https://www.example.com/stats");
    assert!(body["created_at"].is_string());
    assert!(body["expiration_date"].is_null());
}

#[tokio::test]
async fn stats_include_future_expiration() {
    let app = memory_app();
    let future: Timestamp = "2099-01-01T00:00:00Z".parse().unwrap();
    let body = json!({ "long_url": "https://example.com", "expiration_date": future }).to_string();
    send(&app, post_json("/urls", &body)).await;

    let body = json_body(send(&app, get("/urls/1/stats")).await).await;
    assert_eq!(body["expiration_date"], "2099-01-01T00:00:00Z");
}

#[tokio::test]
async fn health_reports_store_stats() {
    let app = memory_app();
    shorten(&app, "https://example.com/a").await;
    shorten(&app, "https://example.com/b").await;

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "status": "healthy",
            "stats": { "total_urls": 2, "current_counter": 2, "storage_type": "memory" },
        })
    );
}

#[tokio::test]
async fn rate_limit_applies_per_client_ip() {
    let state = AppState::new(Arc::new(InMemoryStore::new()), BASE_URL);
    let app = App::router(state, &config(3));

    for remaining in ["2", "1", "0"] {
        let response = send(&app, from_peer(get("/health"), "192.168.1.100:12345")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "3");
        assert_eq!(response.headers()["x-ratelimit-window"], "60");
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let limited = send(&app, from_peer(get("/health"), "192.168.1.100:12345")).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = limited.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=20).contains(&retry_after));
    assert!(limited.headers().contains_key("x-ratelimit-reset"));
    assert_eq!(json_body(limited).await["error"], "Rate limit exceeded");

    let other = send(&app, from_peer(get("/health"), "10.0.0.1:54321")).await;
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = memory_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/urls")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert!(response.status().is_success());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn shared_store_outage_surfaces_as_errors() {
    let redis = FakeRedis::new();
    let store = RedisStore::with_connection(redis.clone()).await.unwrap();
    let app = App::router(AppState::new(Arc::new(store), BASE_URL), &config(1000));

    assert_eq!(shorten(&app, "https://example.com").await, "http://localhost:8080/1");
    redis.set_available(false);

    assert_eq!(send(&app, get("/1")).await.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json!({ "long_url": "https://example.com/2" }).to_string();
    let response = send(&app, post_json("/urls", &body)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let health = json_body(send(&app, get("/health")).await).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["stats"]["total_urls"], 0);
    assert_eq!(health["stats"]["current_counter"], 1);
    assert_eq!(health["stats"]["degraded"], true);
}

#[tokio::test]
async fn rate_limit_reset_and_rejection_body() {
    let state = AppState::new(Arc::new(InMemoryStore::new()), BASE_URL);
    let app = App::router(state, &config(1));
    let before = Timestamp::now().as_second();

    let allowed = send(&app, from_peer(get("/health"), "192.168.1.104:12345")).await;
    let reset: i64 = allowed.headers()["x-ratelimit-reset"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((before + 60..=before + 61).contains(&reset));

    let limited = send(&app, from_peer(get("/health"), "192.168.1.104:12345")).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.headers()["x-ratelimit-remaining"], "0");

    let body = json_body(limited).await;
    assert_eq!(body["limit"], 1);
    assert_eq!(body["window"], "60 seconds");
    assert_eq!(body["message"], "Maximum 1 requests per minute per IP");
}

#[tokio::test]
async fn fixed_routes_take_precedence_over_short_codes() {
    let app = memory_app();
    let health = get("/health");
    assert_eq!(ShortCode::new("health").unwrap().as_str(), "health");

    let response = send(&app, health).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");

    assert_eq!(send(&app, get("/urls")).await.status(), StatusCode::METHOD_NOT_ALLOWED);
}
