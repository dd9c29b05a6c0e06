//! Blockspring: invoke and implement remote "block" functions over
//! HTTP/JSON.
//!
//! The workspace splits along the two halves of the protocol:
//! [`Client`] for calling remote blocks, [`define`] for implementing
//! one, with the shared envelope model ([`Parser`], [`Request`],
//! [`Response`]) underneath. This crate re-exports the whole surface.
//!
//! Implementing a block:
//!
//! ```ignore
//! use blockspring::define;
//!
//! fn main() {
//!     define(|request, response| {
//!         let n = request.params()["n"].as_i64().unwrap_or(0);
//!         response.add_output("doubled", n * 2);
//!         response.end();
//!     });
//! }
//! ```
//!
//! Calling one:
//!
//! ```ignore
//! use blockspring::{BlockOutput, Client};
//! use serde_json::json;
//!
//! let client = Client::from_env()?;
//! let output = client.run("myns/double", &json!({"n": 21}))?;
//! ```

pub use blockspring_block::{define, request_from, try_define};
pub use blockspring_client::{
    BlockOutput, Client, Error as ClientError, ParsedOutput,
};
pub use blockspring_protocol::{
    Envelope, Error as ProtocolError, ErrorRecord, Fetcher, FileReference, HttpFetcher,
    Materialized, Parser, Request, Response,
};
