use super::*;
use crate::error::{NETWORK_ERROR_MESSAGE, TOKEN_ERROR_MESSAGE};
use crate::services::upstream::UpstreamError;
use crate::test_support::{http_client, spawn};
use axum::Router;
use axum::http::StatusCode;
use axum::routing::any;
use serde_json::{Value, json};

// =============================================================================
// parse_body
// =============================================================================

#[test]
fn get_and_delete_never_carry_a_body() {
    for method in [Method::GET, Method::DELETE, Method::HEAD] {
        let parsed = parse_body(&method, Some("application/json"), Bytes::from_static(b"{\"a\":1}")).unwrap();
        assert_eq!(parsed, None, "{method} should ignore its body");
    }
}

#[test]
fn empty_json_body_is_none_not_an_error() {
    for raw in [&b""[..], b"   ", b"\n"] {
        let parsed = parse_body(&Method::POST, Some("application/json"), Bytes::copy_from_slice(raw)).unwrap();
        assert_eq!(parsed, None);
    }
}

#[test]
fn json_body_is_parsed() {
    let parsed = parse_body(&Method::PATCH, Some("application/json"), Bytes::from_static(br#"{"nickname":"n"}"#))
        .unwrap();
    assert_eq!(parsed, Some(ProxyBody::Json(json!({"nickname": "n"}))));
}

#[test]
fn missing_content_type_is_treated_as_json() {
    let parsed = parse_body(&Method::POST, None, Bytes::from_static(b"[1,2]")).unwrap();
    assert_eq!(parsed, Some(ProxyBody::Json(json!([1, 2]))));
}

#[test]
fn malformed_json_is_bad_request() {
    let err = parse_body(&Method::POST, Some("application/json"), Bytes::from_static(b"{oops")).unwrap_err();
    assert!(matches!(err, BffError::BadRequest(_)));
}

#[test]
fn multipart_is_kept_raw_with_boundary() {
    let ct = "multipart/form-data; boundary=----abc";
    let raw = Bytes::from_static(b"------abc\r\n...\r\n------abc--");
    let parsed = parse_body(&Method::POST, Some(ct), raw.clone()).unwrap();
    assert_eq!(parsed, Some(ProxyBody::FormData { content_type: ct.to_owned(), bytes: raw }));
}

#[test]
fn multipart_detection_is_case_insensitive() {
    let parsed = parse_body(&Method::POST, Some("Multipart/Form-Data; boundary=x"), Bytes::from_static(b"x")).unwrap();
    assert!(matches!(parsed, Some(ProxyBody::FormData { .. })));
}

#[test]
fn plain_text_is_kept_as_text() {
    let parsed = parse_body(&Method::POST, Some("text/plain; charset=utf-8"), Bytes::from_static(b"not { json")).unwrap();
    assert_eq!(parsed, Some(ProxyBody::Text("not { json".to_owned())));
}

#[test]
fn empty_plain_text_is_none() {
    let parsed = parse_body(&Method::PUT, Some("text/plain"), Bytes::from_static(b"  ")).unwrap();
    assert_eq!(parsed, None);
}

// =============================================================================
// upstream_endpoint
// =============================================================================

#[test]
fn upstream_endpoint_strips_api_prefix() {
    assert_eq!(upstream_endpoint("/api/my-activities/3/reservations"), "/my-activities/3/reservations");
    assert_eq!(upstream_endpoint("/api/users/me"), "/users/me");
}

#[test]
fn upstream_endpoint_leaves_other_paths_alone() {
    assert_eq!(upstream_endpoint("/apiary"), "/apiary");
    assert_eq!(upstream_endpoint("/activities"), "/activities");
}

// =============================================================================
// extractors + authenticated()
// =============================================================================

async fn echo_router() -> String {
    let router = Router::new()
        .route(
            "/api/echo",
            any(|req: AuthedRequest| async move {
                authenticated(req, |req| async move {
                    let body = match req.body {
                        Some(ProxyBody::Json(v)) => v,
                        Some(ProxyBody::FormData { content_type, .. }) => json!({ "form": content_type }),
                        Some(ProxyBody::Text(t)) => Value::String(t),
                        None => Value::Null,
                    };
                    Ok::<_, BffError>(json!({ "token": req.access_token, "body": body }))
                })
                .await
            }),
        )
        .route(
            "/api/public",
            any(|req: ProxyRequest| async move {
                respond(Ok::<_, BffError>(json!({
                    "token": req.access_token,
                    "endpoint": req.endpoint(),
                    "query": req.proxy_options().query,
                })))
            }),
        )
        .route(
            "/api/upstream-denied",
            any(|req: AuthedRequest| async move {
                authenticated(req, |_| async {
                    Err::<Value, _>(BffError::from(UpstreamError::Api { status: 403, message: "본인의 체험만 수정할 수 있습니다.".into() }))
                })
                .await
            }),
        )
        .route(
            "/api/upstream-down",
            any(|req: AuthedRequest| async move {
                authenticated(req, |_| async { Err::<Value, _>(BffError::from(UpstreamError::Timeout)) }).await
            }),
        );
    spawn(router).await
}

#[tokio::test]
async fn missing_cookie_is_401_with_token_message() {
    let base = echo_router().await;
    let resp = http_client()
        .post(format!("{base}/api/echo"))
        .header("content-type", "application/json")
        .body("{\"a\":1}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": TOKEN_ERROR_MESSAGE }));
}

#[tokio::test]
async fn missing_cookie_wins_over_malformed_body() {
    let base = echo_router().await;
    let resp = http_client()
        .post(format!("{base}/api/echo"))
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_and_json_body_reach_handler() {
    let base = echo_router().await;
    let resp = http_client()
        .post(format!("{base}/api/echo"))
        .header("cookie", "accessToken=tok-1")
        .header("content-type", "application/json")
        .body(r#"{"title":"서울 야경 투어"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "token": "tok-1", "body": { "title": "서울 야경 투어" } }));
}

#[tokio::test]
async fn empty_post_body_reaches_handler_as_none() {
    let base = echo_router().await;
    let resp = http_client()
        .post(format!("{base}/api/echo"))
        .header("cookie", "accessToken=tok-1")
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["body"], Value::Null);
}

#[tokio::test]
async fn malformed_body_with_cookie_is_400() {
    let base = echo_router().await;
    let resp = http_client()
        .patch(format!("{base}/api/echo"))
        .header("cookie", "accessToken=tok-1")
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn upstream_error_status_and_message_pass_through() {
    let base = echo_router().await;
    let resp = http_client()
        .get(format!("{base}/api/upstream-denied"))
        .header("cookie", "accessToken=tok-1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "본인의 체험만 수정할 수 있습니다.");
}

#[tokio::test]
async fn other_failures_are_500_network_error() {
    let base = echo_router().await;
    let resp = http_client()
        .get(format!("{base}/api/upstream-down"))
        .header("cookie", "accessToken=tok-1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn proxy_request_allows_missing_token_and_keeps_query() {
    let base = echo_router().await;
    let resp = http_client()
        .get(format!("{base}/api/public?page=2&size=8"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "token": null, "endpoint": "/public", "query": "page=2&size=8" }));
}
