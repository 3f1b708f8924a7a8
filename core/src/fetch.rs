//! The transport seam.
//!
//! # Design
//! The library never opens a socket itself. A `Fetch` implementation takes
//! the translated `(url, init)` pair and returns the response as plain data.
//! Callers bring their own transport; `UreqFetch` covers the common case.

use std::future::Future;

use crate::http::{FetchInit, RawResponse};

/// Asynchronous fetch-style transport.
///
/// Implementations must return non-2xx statuses as ordinary responses and
/// only fail when no response was obtained.
pub trait Fetch: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform the request and return the full response.
    ///
    /// When `init.body` dictates a `Content-Type` (multipart) and the
    /// headers carry none, the implementation must send the body's type.
    fn fetch(
        &self,
        url: &str,
        init: &FetchInit,
    ) -> impl Future<Output = Result<RawResponse, Self::Error>> + Send;
}

#[cfg(feature = "ureq")]
mod ureq_impl {
    use thiserror::Error;
    use ureq::http;

    use super::Fetch;
    use crate::http::{FetchInit, RawResponse};

    /// `Fetch` over a blocking `ureq` agent, run on tokio's blocking pool.
    ///
    /// Response bodies are read in full with no size cap unless one is set
    /// with [`UreqFetch::with_body_limit`].
    #[derive(Debug, Clone)]
    pub struct UreqFetch {
        agent: ureq::Agent,
        body_limit: u64,
    }

    #[derive(Debug, Error)]
    pub enum UreqFetchError {
        #[error("invalid request: {0}")]
        Request(#[from] http::Error),

        #[error(transparent)]
        Transport(#[from] ureq::Error),

        #[error("transport task failed: {0}")]
        Join(#[from] tokio::task::JoinError),
    }

    impl UreqFetch {
        /// Agent that returns 4xx/5xx responses as data.
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self::with_agent(agent)
        }

        /// Use a preconfigured agent. It should have `http_status_as_error`
        /// disabled, or error statuses surface as transport errors.
        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self {
                agent,
                body_limit: u64::MAX,
            }
        }

        /// Fail responses whose body exceeds `limit` bytes.
        pub fn with_body_limit(mut self, limit: u64) -> Self {
            self.body_limit = limit;
            self
        }
    }

    impl Default for UreqFetch {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Fetch for UreqFetch {
        type Error = UreqFetchError;

        async fn fetch(&self, url: &str, init: &FetchInit) -> Result<RawResponse, Self::Error> {
            let mut builder = http::Request::builder()
                .method(init.method.as_str())
                .uri(url);
            for (name, value) in init.headers.iter() {
                builder = builder.header(name, value);
            }
            let body = match &init.body {
                Some(body) => {
                    if let Some(content_type) = body.content_type() {
                        if !init.headers.contains("content-type") {
                            builder = builder.header("content-type", content_type);
                        }
                    }
                    Some(body.to_bytes())
                }
                None => None,
            };

            let agent = self.agent.clone();
            let limit = self.body_limit;
            tokio::task::spawn_blocking(move || execute(&agent, builder, body, limit)).await?
        }
    }

    fn execute(
        agent: &ureq::Agent,
        builder: http::request::Builder,
        body: Option<Vec<u8>>,
        limit: u64,
    ) -> Result<RawResponse, UreqFetchError> {
        let mut response = match body {
            Some(bytes) => agent.run(builder.body(bytes)?)?,
            None => agent.run(builder.body(())?)?,
        };

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // ureq caps bodies at 10 MiB unless told otherwise.
        let body = response.body_mut().with_config().limit(limit).read_to_vec()?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(feature = "ureq")]
pub use ureq_impl::{UreqFetch, UreqFetchError};
