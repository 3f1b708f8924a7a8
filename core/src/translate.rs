//! Axios config -> fetch parameters.
//!
//! # Design
//! `translate` is a pure function of `(Defaults, RequestConfig)`. Header
//! precedence, lowest first: common defaults, per-method defaults, per-call
//! headers, then the `Authorization` header derived from `auth`.

use serde_json::{Map, Value};
use tracing::trace;
use url::Url;

use crate::config::{DataType, Defaults, RequestConfig};
use crate::error::{Error, Result};
use crate::http::{value_to_string, Body, FetchInit, Headers, HttpMethod};
use crate::multipart::FormData;

/// Map a config onto the `(url, init)` pair a fetch call takes.
pub fn translate(defaults: &Defaults, config: &RequestConfig) -> Result<(String, FetchInit)> {
    let requested = config
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(Error::MissingUrl)?;
    let base = config
        .base_url
        .as_deref()
        .filter(|b| !b.is_empty())
        .or_else(|| defaults.base_url.as_deref().filter(|b| !b.is_empty()));

    let url = resolve_url(requested, base, &config.params)?;
    let method = config.method.unwrap_or(HttpMethod::Get);
    let data_type = config.data_type.unwrap_or(defaults.data_type);
    let headers = merge_headers(defaults, config, method, data_type);
    let body = build_body(defaults, config, data_type)?;

    trace!(%method, %url, headers = headers.len(), has_body = body.is_some(), "translated request");
    Ok((url, FetchInit { method, headers, body }))
}

fn resolve_url(requested: &str, base: Option<&str>, params: &Map<String, Value>) -> Result<String> {
    let mut url = match base {
        Some(base) => Url::parse(base)
            .map_err(|source| Error::InvalidUrl {
                url: base.to_string(),
                source,
            })?
            .join(requested),
        None => Url::parse(requested),
    }
    .map_err(|source| Error::InvalidUrl {
        url: requested.to_string(),
        source,
    })?;

    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, &value_to_string(value));
        }
    }

    // URL parsing turns "https://x.com" into "https://x.com/"; give back
    // what the caller wrote when they did not ask for the root path.
    let bare_root = url.path() == "/" && url.query().is_none() && url.fragment().is_none();
    let serialized = String::from(url);
    if bare_root && !requested.ends_with('/') {
        if let Some(stripped) = serialized.strip_suffix('/') {
            return Ok(stripped.to_string());
        }
    }
    Ok(serialized)
}

fn merge_headers(
    defaults: &Defaults,
    config: &RequestConfig,
    method: HttpMethod,
    data_type: DataType,
) -> Headers {
    let mut headers = defaults.headers.common.clone();
    if let Some(method_headers) = defaults.headers.for_method(method) {
        headers.merge(method_headers);
    }
    headers.merge(&config.headers);
    if let Some(auth) = &config.auth {
        headers.insert("Authorization", auth.header_value());
    }
    // The transport sets a multipart Content-Type carrying the boundary.
    if data_type == DataType::FormData {
        headers.remove("Content-Type");
    }
    headers
}

fn build_body(defaults: &Defaults, config: &RequestConfig, data_type: DataType) -> Result<Option<Body>> {
    if defaults.data.is_none() && config.data.is_none() {
        return Ok(None);
    }

    let mut data = defaults.data.clone().unwrap_or_default();
    if let Some(call_data) = &config.data {
        for (key, value) in call_data {
            data.insert(key.clone(), value.clone());
        }
    }

    let body = match data_type {
        DataType::Json => Body::Json(serde_json::to_string(&data).map_err(Error::Serialize)?),
        DataType::FormData => Body::FormData(
            data.iter()
                .map(|(key, value)| (key.clone(), value_to_string(value)))
                .collect::<FormData>(),
        ),
    };
    Ok(Some(body))
}
