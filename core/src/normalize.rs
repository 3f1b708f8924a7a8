//! Raw transport response -> Axios-like `Response`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::RequestConfig;
use crate::error::{Error, Result};
use crate::http::{Headers, RawResponse};

/// A decoded response in the shape Axios callers expect.
#[derive(Debug, Clone)]
pub struct Response {
    /// The config the request was made with.
    pub config: RequestConfig,
    /// The transport's response, body included.
    pub response: RawResponse,
    /// Response headers with lowercase names.
    pub headers: Headers,
    /// Parsed JSON for `application/json`, otherwise the body as a string.
    pub data: Value,
    pub status: u16,
    /// `data` when it is a string, otherwise the status text.
    pub text: String,
}

impl Response {
    /// Deserialize `data` into a concrete type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.data).map_err(Error::Decode)
    }
}

/// Decode `raw` according to its content type.
pub fn normalize(raw: RawResponse, config: RequestConfig) -> Result<Response> {
    let headers = flatten_headers(&raw.headers);
    let content_type = simple_type(headers.get("content-type"));

    let data = match content_type {
        "application/json" => serde_json::from_slice(&raw.body).map_err(Error::Decode)?,
        _ => Value::String(String::from_utf8_lossy(&raw.body).into_owned()),
    };
    let text = match &data {
        Value::String(s) => s.clone(),
        _ => raw.status_text.clone(),
    };

    debug!(status = raw.status, content_type, "normalized response");
    Ok(Response {
        config,
        status: raw.status,
        response: raw,
        headers,
        data,
        text,
    })
}

/// Leading `type/subtype` of a `Content-Type` value, without parameters.
///
/// Only lowercase letters, `-` and `/` are taken. An absent header reads as
/// `text/plain`; a value that starts with anything else is returned whole.
pub fn simple_type(content_type: Option<&str>) -> &str {
    let Some(value) = content_type else {
        return "text/plain";
    };
    let end = value
        .find(|c: char| !(c.is_ascii_lowercase() || c == '-' || c == '/'))
        .unwrap_or(value.len());
    if end == 0 {
        value
    } else {
        &value[..end]
    }
}

fn flatten_headers(pairs: &[(String, String)]) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in pairs {
        headers.append(name.to_ascii_lowercase(), value.as_str());
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn raw(status: u16, content_type: Option<&str>, body: &str) -> RawResponse {
        RawResponse {
            status,
            status_text: "OK".to_string(),
            headers: content_type
                .map(|ct| vec![("Content-Type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn simple_type_strips_parameters() {
        assert_eq!(simple_type(Some("application/json; charset=utf-8")), "application/json");
        assert_eq!(simple_type(Some("text/html;charset=UTF-8")), "text/html");
        assert_eq!(simple_type(None), "text/plain");
    }

    #[test]
    fn simple_type_is_case_sensitive() {
        assert_eq!(simple_type(Some("Application/JSON")), "Application/JSON");
        assert_eq!(simple_type(Some("application/vnd.api+json")), "application/vnd");
    }

    #[test]
    fn json_body_is_parsed() {
        let response = normalize(
            raw(200, Some("application/json; charset=utf-8"), r#"{"foo":1,"baz":[1,null,"3"]}"#),
            RequestConfig::new("/"),
        )
        .unwrap();
        assert_eq!(response.data, json!({"foo": 1, "baz": [1, null, "3"]}));
        assert_eq!(response.text, "OK");
        assert_eq!(response.status, 200);
    }

    #[test]
    fn html_body_is_text() {
        let response = normalize(
            raw(200, Some("text/html; charset=utf-8"), "<strong>Hello World</strong>"),
            RequestConfig::new("/"),
        )
        .unwrap();
        assert_eq!(response.data, json!("<strong>Hello World</strong>"));
        assert_eq!(response.text, "<strong>Hello World</strong>");
    }

    #[test]
    fn unknown_types_fall_back_to_text() {
        let response = normalize(raw(200, Some("image/svg+xml"), "<svg/>"), RequestConfig::new("/")).unwrap();
        assert_eq!(response.data, json!("<svg/>"));
    }

    #[test]
    fn empty_body_without_content_type_decodes() {
        let response = normalize(raw(200, None, ""), RequestConfig::new("/")).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.data, json!(""));
        assert_eq!(response.text, "");
    }

    #[test]
    fn json_string_payload_becomes_text() {
        let response = normalize(raw(200, Some("application/json"), r#""hi""#), RequestConfig::new("/")).unwrap();
        assert_eq!(response.text, "hi");
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = normalize(raw(200, Some("application/json"), "{nope"), RequestConfig::new("/")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn headers_are_lowercased_and_joined() {
        let response = normalize(
            RawResponse {
                status: 204,
                status_text: "No Content".to_string(),
                headers: vec![
                    ("Set-Cookie".to_string(), "a=1".to_string()),
                    ("set-cookie".to_string(), "b=2".to_string()),
                    ("X-Trace".to_string(), "abc".to_string()),
                ],
                body: Vec::new(),
            },
            RequestConfig::new("/"),
        )
        .unwrap();
        let pairs: Vec<_> = response.headers.iter().collect();
        assert_eq!(pairs, vec![("set-cookie", "a=1, b=2"), ("x-trace", "abc")]);
    }

    #[test]
    fn json_round_trips_through_request_body() {
        let body = serde_json::to_string(&json!({"a": 1})).unwrap();
        let response = normalize(raw(200, Some("application/json"), &body), RequestConfig::new("/")).unwrap();
        assert_eq!(response.data, json!({"a": 1}));
    }

    #[test]
    fn typed_access_deserializes_data() {
        #[derive(Deserialize)]
        struct Payload {
            foo: u32,
        }
        let response = normalize(raw(200, Some("application/json"), r#"{"foo":7}"#), RequestConfig::new("/")).unwrap();
        assert_eq!(response.json::<Payload>().unwrap().foo, 7);
    }
}
