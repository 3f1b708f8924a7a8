use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn content_type(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

// --- basic ---

#[tokio::test]
async fn basic_200_is_plain_ok() {
    let resp = app().oneshot(get("/basic/200")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).unwrap().starts_with("text/plain"));
    assert_eq!(body_bytes(resp).await, "OK");
}

#[tokio::test]
async fn basic_empty_has_no_body_or_type() {
    let resp = app().oneshot(get("/basic/empty")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).is_none());
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn basic_json_returns_object() {
    let resp = app().oneshot(get("/basic/json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), Some("application/json"));
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"foo": 1, "bar": "bar!", "baz": [1, null, "3"]}));
}

#[tokio::test]
async fn basic_html_returns_markup() {
    let resp = app().oneshot(get("/basic/html")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).unwrap().starts_with("text/html"));
    assert_eq!(body_bytes(resp).await, "<strong>Hello World</strong>");
}

#[tokio::test]
async fn basic_bytes_returns_requested_length() {
    let resp = app().oneshot(get("/basic/bytes/5")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).unwrap().starts_with("text/plain"));
    assert_eq!(body_bytes(resp).await, "aaaaa");
}

// --- status ---

#[tokio::test]
async fn status_route_answers_with_requested_code() {
    let resp = app().oneshot(get("/basic/status/418")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn status_route_rejects_out_of_range_code() {
    let resp = app().oneshot(get("/basic/status/1000")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_query_headers_and_body() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/echo?a=1&b=two")
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "abc")
        .body(r#"{"foo":1}"#.to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.query.as_deref(), Some("a=1&b=two"));
    assert_eq!(echo.headers.get("x-request-id").map(String::as_str), Some("abc"));
    assert_eq!(echo.body, r#"{"foo":1}"#);
}

#[tokio::test]
async fn echo_get_without_query() {
    let resp = app().oneshot(get("/echo")).await.unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert!(echo.query.is_none());
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app().oneshot(get("/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
