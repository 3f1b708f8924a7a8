//! Request configuration in the Axios shape.
//!
//! # Design
//! `Defaults` is plain owned data: a `Client` holds one and hands it to the
//! translator by reference, so there is no hidden global shared between
//! callers. Both `Defaults` and `RequestConfig` deserialize from the JSON
//! key names Axios uses (`baseURL`, `dataType`, `headers.common`, ...).

use std::collections::HashMap;
use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BoxError, Error, Result};
use crate::http::{FetchInit, Headers, HttpMethod};

/// Axios options that have no equivalent here. Rejected in debug builds so
/// that silently ignored settings show up during development.
const UNSUPPORTED_OPTIONS: &[&str] = &[
    "transformRequest",
    "transformResponse",
    "paramsSerializer",
    "timeout",
    "withCredentials",
    "adapter",
    "responseType",
    "responseEncoding",
    "xsrfCookieName",
    "xsrfHeaderName",
    "onUploadProgress",
    "onDownloadProgress",
    "maxContentLength",
    "maxBodyLength",
    "validateStatus",
    "maxRedirects",
    "socketPath",
    "httpAgent",
    "httpsAgent",
    "proxy",
    "cancelToken",
    "decompress",
];

/// Keys that hold functions in Axios configs and cannot come from JSON.
const CALLABLE_OPTIONS: &[&str] = &["fetch", "onConfig"];

/// How the request payload is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    #[default]
    Json,
    FormData,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Json => "json",
            DataType::FormData => "formData",
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(DataType::Json),
            "formData" => Ok(DataType::FormData),
            other => Err(Error::UnknownDataType(other.to_string())),
        }
    }
}

impl TryFrom<String> for DataType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

/// Credentials for HTTP Basic authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

/// Future returned by a `ConfigHook`, borrowing the request it edits.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = std::result::Result<(), BoxError>> + Send + 'a>>;

type HookFn = dyn for<'a> Fn(&'a str, &'a mut FetchInit) -> HookFuture<'a> + Send + Sync;

/// Callback run on the translated request just before it is dispatched.
///
/// The hook sees the final URL and may mutate the `FetchInit` in place. It
/// is awaited before the transport is called, so it can do async work such
/// as fetching a token. Returning an error aborts the request.
#[derive(Clone)]
pub struct ConfigHook(Arc<HookFn>);

impl ConfigHook {
    /// Wrap an async hook. The closure returns a boxed future:
    ///
    /// ```
    /// use axfetch_core::{BoxError, ConfigHook};
    ///
    /// let hook = ConfigHook::new(|_url, init| {
    ///     Box::pin(async move {
    ///         init.headers.insert("X-Signed", "yes");
    ///         Ok::<(), BoxError>(())
    ///     })
    /// });
    /// ```
    pub fn new<F>(hook: F) -> Self
    where
        F: for<'a> Fn(&'a str, &'a mut FetchInit) -> HookFuture<'a> + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    /// Wrap a hook that finishes without awaiting anything.
    pub fn from_fn<F>(hook: F) -> Self
    where
        F: Fn(&str, &mut FetchInit) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        Self::new(move |url, init| Box::pin(future::ready(hook(url, init))))
    }

    pub(crate) async fn call(&self, url: &str, init: &mut FetchInit) -> std::result::Result<(), BoxError> {
        (self.0)(url, init).await
    }
}

impl fmt::Debug for ConfigHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigHook(..)")
    }
}

/// Default headers: `common` applies to every request, the per-method sets
/// (`get`, `post`, ...) only to requests with that method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultHeaders {
    #[serde(default)]
    pub common: Headers,
    #[serde(flatten)]
    pub methods: HashMap<HttpMethod, Headers>,
}

impl DefaultHeaders {
    pub fn for_method(&self, method: HttpMethod) -> Option<&Headers> {
        self.methods.get(&method)
    }

    pub fn method_mut(&mut self, method: HttpMethod) -> &mut Headers {
        self.methods.entry(method).or_default()
    }
}

/// Base configuration merged into every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Defaults {
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    pub headers: DefaultHeaders,
    pub data_type: DataType,
    pub data: Option<Map<String, Value>>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: DefaultHeaders {
                common: Headers::from([("Content-Type", "application/json;charset=UTF-8")]),
                methods: HashMap::new(),
            },
            data_type: DataType::Json,
            data: None,
        }
    }
}

impl Defaults {
    /// Parse defaults from an Axios-shaped JSON value. Missing keys keep
    /// their built-in values.
    pub fn from_value(value: Value) -> Result<Self> {
        check_data_type(&value)?;
        serde_json::from_value(value).map_err(Error::InvalidConfig)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(Error::InvalidConfig)?;
        Self::from_value(value)
    }
}

/// A single request described in Axios terms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestConfig {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    /// Appended to the URL as query parameters, in order.
    pub params: Map<String, Value>,
    pub headers: Headers,
    pub auth: Option<Auth>,
    pub data: Option<Map<String, Value>>,
    pub data_type: Option<DataType>,
    #[serde(skip)]
    pub on_config: Option<ConfigHook>,
}

impl RequestConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Parse a config from an Axios-shaped JSON object.
    ///
    /// Debug builds reject Axios options this crate does not implement.
    /// Non-null function keys (`fetch`, `onConfig`) are always rejected; pass
    /// a transport or a `ConfigHook` instead.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(object) = value.as_object() {
            if cfg!(debug_assertions) {
                if let Some(key) = UNSUPPORTED_OPTIONS.iter().find(|k| object.contains_key(**k)) {
                    return Err(Error::UnsupportedOption((*key).to_string()));
                }
            }
            let set = |key: &str| object.get(key).is_some_and(|v| !v.is_null());
            if let Some(key) = CALLABLE_OPTIONS.iter().find(|k| set(k)) {
                return Err(Error::NotCallable((*key).to_string()));
            }
        }
        check_data_type(&value)?;
        if let Some(Value::String(method)) = value.get("method") {
            method.parse::<HttpMethod>()?;
        }
        serde_json::from_value(value).map_err(Error::InvalidConfig)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn with_on_config(mut self, hook: ConfigHook) -> Self {
        self.on_config = Some(hook);
        self
    }
}

/// Surface a bad `dataType` as its own error instead of a generic serde one.
fn check_data_type(value: &Value) -> Result<()> {
    match value.get("dataType") {
        Some(Value::String(name)) => name.parse::<DataType>().map(|_| ()),
        _ => Ok(()),
    }
}
