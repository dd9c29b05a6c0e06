//! # blockspring-client
//!
//! Caller-side client for remote Blockspring block execution.
//!
//! Serializes a mapping of named inputs to JSON, POSTs it to the
//! execution endpoint, and unwraps the response:
//!
//! ```ignore
//! use blockspring_client::{BlockOutput, Client};
//! use serde_json::json;
//!
//! let client = Client::from_env()?;
//! match client.run("myns/block1", &json!({"x": 1}))? {
//!     BlockOutput::Json(value) => println!("{value}"),
//!     BlockOutput::Text(raw) => println!("not json: {raw}"),
//! }
//! ```
//!
//! [`Client::run_parsed`] goes one step further and resolves object
//! responses through the envelope parser, so file outputs in the
//! response land as local temp-file paths.

pub mod client;
pub mod error;

pub use client::{API_KEY_VAR, BASE_URL_VAR, BlockOutput, Client, DEFAULT_BASE_URL, ParsedOutput};
pub use error::Error;
