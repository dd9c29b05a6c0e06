//! Error types for the client layer.

/// Errors raised while invoking a remote block.
///
/// Only argument and transport failures are errors. A response body that
/// is not JSON, or a non-2xx status with a body, is not an error: those
/// degrade to the raw-text and parsed-response paths on
/// [`Client::run`](crate::Client::run).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `run`/`run_parsed` called with a non-object data argument.
    #[error("your data needs to be a dictionary")]
    NotADictionary,

    /// The base URL could not be parsed.
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// Transport-level failure with no response to fall back on.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Envelope parsing failed while resolving a response.
    #[error(transparent)]
    Protocol(#[from] blockspring_protocol::Error),
}
