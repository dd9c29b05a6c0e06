//! # blockspring-protocol
//!
//! Payload parsing and result marshalling for Blockspring blocks.
//!
//! A block invocation arrives as a JSON object. When the object carries a
//! truthy `_blockspring_spec` marker it is a *spec envelope*: `_errors`
//! and `_headers` get control semantics and file-shaped values (inline
//! base64 or a remote URL) are materialized into local temporary files.
//! Any other object is a plain input map and passes through untouched.
//!
//! The response side is symmetric: a [`Response`] accumulates named
//! outputs, file outputs, and error records into a spec envelope and
//! emits it as one JSON line.
//!
//! ## Parsing a payload
//!
//! ```ignore
//! use blockspring_protocol::Parser;
//!
//! let parser = Parser::new();
//! let request = parser.parse_str(r#"{
//!     "_blockspring_spec": true,
//!     "name": "Ann",
//!     "avatar": {"filename": "a.png", "data": "aGk="}
//! }"#)?;
//!
//! // `avatar` is now a path to a temp file holding the decoded bytes.
//! let avatar_path = request.params()["avatar"].as_str().unwrap();
//! ```
//!
//! ## Building a result
//!
//! ```ignore
//! use blockspring_protocol::Response;
//!
//! let mut response = Response::new();
//! response
//!     .add_output("greeting", "hello")
//!     .add_error_output("partial result", Some("upstream timed out"));
//! response.add_file_output("report", "/tmp/report.csv")?;
//! response.end();
//! ```

pub mod attachment;
pub mod envelope;
pub mod error;
pub mod parser;
pub mod request;
pub mod response;

pub use attachment::{Fetcher, HttpFetcher, Materialized, materialize};
pub use envelope::{ERRORS_KEY, Envelope, ErrorRecord, FileReference, HEADERS_KEY, SPEC_KEY};
pub use error::Error;
pub use parser::Parser;
pub use request::Request;
pub use response::Response;
