//! Error types for request translation, dispatch and response decoding.
//!
//! # Design
//! Validation failures (`MissingUrl`, `InvalidUrl`, `InvalidMethod`, `NotCallable`,
//! `UnsupportedOption`, `InvalidConfig`, `Hook`) are raised before any
//! network activity. Transport and decode failures carry the underlying
//! error as their source rather than flattening it into a string.

use thiserror::Error;

/// Boxed error used for transport and hook failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The config had no `url`.
    #[error("missing config field: `url`")]
    MissingUrl,

    /// The URL (or base URL) could not be resolved.
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported HTTP method `{0}`")]
    InvalidMethod(String),

    /// An Axios-only config key that this crate does not implement.
    #[error("the `{0}` config parameter is not supported")]
    UnsupportedOption(String),

    /// A function-valued option was given a non-function value.
    #[error("function required: `{0}`")]
    NotCallable(String),

    /// The config JSON did not match the expected shape.
    #[error("invalid config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("unknown data type `{0}`")]
    UnknownDataType(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The `on_config` hook returned an error.
    #[error("config hook failed: {0}")]
    Hook(#[source] BoxError),

    /// The transport failed to produce a response.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// The response body could not be decoded as JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}
