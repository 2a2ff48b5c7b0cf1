use super::*;
use crate::test_support::spawn;
use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::{get, post};
use serde_json::json;

fn client(base: &str) -> UpstreamClient {
    UpstreamClient::new(base, Duration::from_millis(500)).unwrap()
}

// =============================================================================
// url_for
// =============================================================================

#[test]
fn url_for_joins_base_and_endpoint() {
    let c = client("https://api.example.com/16-1/");
    assert_eq!(c.url_for("/activities", None), "https://api.example.com/16-1/activities");
}

#[test]
fn url_for_inserts_missing_slash() {
    let c = client("https://api.example.com");
    assert_eq!(c.url_for("users/me", None), "https://api.example.com/users/me");
}

#[test]
fn url_for_appends_query() {
    let c = client("https://api.example.com");
    assert_eq!(
        c.url_for("/activities", Some("method=cursor&size=20")),
        "https://api.example.com/activities?method=cursor&size=20"
    );
}

#[test]
fn url_for_skips_empty_query() {
    let c = client("https://api.example.com");
    assert_eq!(c.url_for("/activities", Some("")), "https://api.example.com/activities");
}

// =============================================================================
// error_message / parse_success_body
// =============================================================================

#[test]
fn error_message_prefers_body_message() {
    let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message":"이메일 형식으로 작성해주세요."}"#);
    assert_eq!(msg, "이메일 형식으로 작성해주세요.");
}

#[test]
fn error_message_falls_back_to_reason_phrase() {
    assert_eq!(error_message(StatusCode::NOT_FOUND, "<html>nope</html>"), "Not Found");
    assert_eq!(error_message(StatusCode::CONFLICT, r#"{"message":""}"#), "Conflict");
}

#[test]
fn parse_success_body_handles_empty_json_and_text() {
    assert_eq!(parse_success_body(""), Value::Null);
    assert_eq!(parse_success_body("  \n"), Value::Null);
    assert_eq!(parse_success_body(r#"{"id":1}"#), json!({"id": 1}));
    assert_eq!(parse_success_body("ok"), Value::String("ok".into()));
}

// =============================================================================
// fetch
// =============================================================================

#[tokio::test]
async fn fetch_returns_json_and_forwards_headers() {
    let upstream = Router::new().route(
        "/users/me",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            axum::Json(json!({ "auth": auth }))
        }),
    );
    let base = spawn(upstream).await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    let value = client(&base)
        .fetch("/users/me", FetchOptions { headers, ..FetchOptions::default() })
        .await
        .unwrap();
    assert_eq!(value, json!({ "auth": "Bearer abc" }));
}

#[tokio::test]
async fn fetch_sends_body_and_query() {
    let upstream = Router::new().route(
        "/echo",
        post(
            |axum::extract::RawQuery(query): axum::extract::RawQuery, headers: HeaderMap, body: String| async move {
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                axum::Json(json!({ "query": query, "type": content_type, "body": body }))
            },
        ),
    );
    let base = spawn(upstream).await;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let value = client(&base)
        .fetch(
            "/echo",
            FetchOptions {
                method: Method::POST,
                headers,
                body: Some(Bytes::from_static(br#"{"a":1}"#)),
                query: Some("x=1".into()),
                timeout: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(value, json!({ "query": "x=1", "type": "application/json", "body": r#"{"a":1}"# }));
}

#[tokio::test]
async fn fetch_maps_error_status_and_message() {
    let upstream = Router::new().route(
        "/auth/login",
        post(|| async { (StatusCode::NOT_FOUND, axum::Json(json!({ "message": "존재하지 않는 유저입니다." }))) }),
    );
    let base = spawn(upstream).await;

    let err = client(&base)
        .fetch("/auth/login", FetchOptions { method: Method::POST, ..FetchOptions::default() })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, UpstreamError::Api { ref message, .. } if message == "존재하지 않는 유저입니다."));
}

#[tokio::test]
async fn fetch_no_content_is_null() {
    let upstream = Router::new().route("/my-notifications/1", axum::routing::delete(|| async { StatusCode::NO_CONTENT }));
    let base = spawn(upstream).await;

    let value = client(&base)
        .fetch("/my-notifications/1", FetchOptions { method: Method::DELETE, ..FetchOptions::default() })
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn fetch_times_out_with_per_call_override() {
    let upstream = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            "late"
        }),
    );
    let base = spawn(upstream).await;

    let err = client(&base)
        .fetch("/slow", FetchOptions { timeout: Some(Duration::from_millis(50)), ..FetchOptions::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Timeout));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn fetch_unreachable_host_is_network_error() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let err = client("http://127.0.0.1:9")
        .fetch("/anything", FetchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Network(_) | UpstreamError::Timeout));
}
