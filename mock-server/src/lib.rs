use std::collections::BTreeMap;

use axum::{
    extract::Path,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Html,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/basic/200", get(plain_ok))
        .route("/basic/empty", get(empty))
        .route("/basic/json", get(json_body))
        .route("/basic/html", get(html_body))
        .route("/basic/bytes/{len}", get(bytes))
        .route("/basic/status/{code}", any(status))
        .route("/echo", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn plain_ok() -> &'static str {
    "OK"
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn json_body() -> Json<Value> {
    Json(json!({
        "foo": 1,
        "bar": "bar!",
        "baz": [1, null, "3"],
    }))
}

async fn html_body() -> Html<&'static str> {
    Html("<strong>Hello World</strong>")
}

/// `len` bytes of `a` as text/plain.
async fn bytes(Path(len): Path<usize>) -> String {
    "a".repeat(len)
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    tracing::debug!(%method, %uri, "echo");
    Json(Echo {
        method: method.to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "POST".to_string(),
            query: Some("a=1".to_string()),
            headers: BTreeMap::from([("x-id".to_string(), "7".to_string())]),
            body: "{}".to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["query"], "a=1");
        assert_eq!(json["headers"]["x-id"], "7");
        assert_eq!(json["body"], "{}");
    }

    #[test]
    fn echo_without_query_serializes_null() {
        let echo = Echo {
            method: "GET".to_string(),
            query: None,
            headers: BTreeMap::new(),
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert!(json["query"].is_null());
    }
}
