//! Error types for the protocol layer.
//!
//! Only payload-level failures are errors here. Attachment
//! materialization and response-body decoding deliberately never error:
//! those fall back to handing the original value through (see
//! [`crate::attachment::Materialized`]).

/// Errors raised while parsing payloads or encoding results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raw payload was not valid JSON.
    #[error("you didn't pass valid json inputs")]
    InvalidJson(#[source] serde_json::Error),

    /// Payload decoded to something other than a JSON object.
    #[error("can't parse keys/values from your json inputs")]
    NotAnObject,

    /// A file output or the input stream could not be read.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
