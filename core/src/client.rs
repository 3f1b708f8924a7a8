//! Request execution: translate, run the hook, fetch, normalize.
//!
//! # Design
//! `execute` is the whole pipeline as a free function over an explicit
//! transport and explicit defaults, so a single call can use a different
//! transport without touching any shared state. `Client` bundles a
//! transport with owned `Defaults` and adds the per-method shorthands.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Defaults, RequestConfig};
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::http::{FetchInit, HttpMethod};
use crate::normalize::{normalize, Response};
use crate::translate::translate;

/// Run one request through `fetch`.
///
/// Validation and the `on_config` hook both complete before the transport
/// is called, so their failures never reach the network.
pub async fn execute<F: Fetch>(fetch: &F, defaults: &Defaults, config: RequestConfig) -> Result<Response> {
    let (url, mut init) = translate(defaults, &config)?;
    if let Some(hook) = &config.on_config {
        hook.call(&url, &mut init).await.map_err(Error::Hook)?;
    }

    debug!(method = %init.method, %url, "dispatching request");
    let raw = fetch
        .fetch(&url, &init)
        .await
        .map_err(|e| Error::Network(Box::new(e)))?;
    normalize(raw, config)
}

/// A transport plus the defaults merged into every request it makes.
#[derive(Debug, Clone)]
pub struct Client<F> {
    fetch: F,
    defaults: Defaults,
}

impl<F: Fetch> Client<F> {
    pub fn new(fetch: F) -> Self {
        Self::with_defaults(fetch, Defaults::default())
    }

    pub fn with_defaults(fetch: F, defaults: Defaults) -> Self {
        Self { fetch, defaults }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut Defaults {
        &mut self.defaults
    }

    pub fn fetcher(&self) -> &F {
        &self.fetch
    }

    /// Translate without sending.
    pub fn translate(&self, config: &RequestConfig) -> Result<(String, FetchInit)> {
        translate(&self.defaults, config)
    }

    pub async fn make_request(&self, config: RequestConfig) -> Result<Response> {
        execute(&self.fetch, &self.defaults, config).await
    }

    /// Send `config` to `url`, keeping whatever method the config names.
    pub async fn request(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.make_request(target(config, url, None, None)).await
    }

    pub async fn get(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Get), None)).await
    }

    pub async fn delete(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Delete), None)).await
    }

    pub async fn head(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Head), None)).await
    }

    pub async fn options(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Options), None)).await
    }

    pub async fn post(
        &self,
        url: &str,
        data: Option<Map<String, Value>>,
        config: RequestConfig,
    ) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Post), data)).await
    }

    pub async fn put(
        &self,
        url: &str,
        data: Option<Map<String, Value>>,
        config: RequestConfig,
    ) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Put), data)).await
    }

    pub async fn patch(
        &self,
        url: &str,
        data: Option<Map<String, Value>>,
        config: RequestConfig,
    ) -> Result<Response> {
        self.make_request(target(config, url, Some(HttpMethod::Patch), data)).await
    }
}

/// Fill in url, method and data, letting anything the config already sets win.
fn target(
    mut config: RequestConfig,
    url: &str,
    method: Option<HttpMethod>,
    data: Option<Map<String, Value>>,
) -> RequestConfig {
    if config.url.is_none() {
        config.url = Some(url.to_string());
    }
    if config.method.is_none() {
        config.method = method;
    }
    if config.data.is_none() {
        config.data = data;
    }
    config
}
