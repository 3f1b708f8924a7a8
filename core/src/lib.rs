//! Axios-style request configs over a fetch-style transport.
//!
//! # Overview
//! Translates an Axios-shaped `RequestConfig` into the `(url, FetchInit)`
//! pair a fetch call takes, hands it to a caller-supplied `Fetch` transport,
//! and reshapes the response into an Axios-like `Response`.
//!
//! # Design
//! - `translate` is pure: the same config and defaults always produce the
//!   same request, and nothing touches the network.
//! - The transport is injected, never discovered. `UreqFetch` (feature
//!   `ureq`, on by default) is the bundled implementation.
//! - `Defaults` belong to a `Client` rather than to the process; each client
//!   merges its own defaults into every request.
//! - Types use owned `String` / `Vec` fields so requests and responses can be
//!   stored, cloned and compared as plain data.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod multipart;
pub mod normalize;
pub mod translate;

pub use client::{execute, Client};
pub use config::{Auth, ConfigHook, DataType, DefaultHeaders, Defaults, HookFuture, RequestConfig};
pub use error::{BoxError, Error, Result};
pub use fetch::Fetch;
#[cfg(feature = "ureq")]
pub use fetch::{UreqFetch, UreqFetchError};
pub use http::{Body, FetchInit, Headers, HttpMethod, RawResponse};
pub use multipart::FormData;
pub use normalize::{normalize, simple_type, Response};
pub use translate::translate;
