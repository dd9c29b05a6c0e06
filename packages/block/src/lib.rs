//! # blockspring-block
//!
//! Callee-side entrypoint for Blockspring blocks.
//!
//! A block binary hands its logic to [`define`], which assembles the
//! [`Request`] from whatever invocation surface is active (a JSON
//! payload piped on standard input, `key=value` command-line arguments,
//! or both) and pairs it with a fresh [`Response`]:
//!
//! ```ignore
//! use blockspring_block::define;
//!
//! fn main() {
//!     define(|request, response| {
//!         let name = request.params()["name"].as_str().unwrap_or("world");
//!         response.add_output("greeting", format!("hello {name}"));
//!         response.end();
//!     });
//! }
//! ```
//!
//! Argument values are applied after the stdin payload, so
//! `--name=Ann` overrides a piped `name`. Arguments always arrive as
//! plain JSON strings; no type coercion happens.

use std::env;
use std::io::{IsTerminal, Read};
use std::process;

use serde_json::Value;

use blockspring_protocol::{Error, Parser, Request, Response};

/// Run block logic against the current invocation.
///
/// Reads the payload from standard input when one is piped (a terminal
/// on stdin means no payload), layers `key=value` arguments on top, and
/// invokes the logic with the request and an empty response. A malformed
/// payload is fatal: the protocol's human-readable message goes to
/// standard error and the process exits non-zero.
pub fn define<F>(logic: F)
where
    F: FnOnce(&Request, &mut Response),
{
    if let Err(error) = try_define(logic) {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}

/// Fallible form of [`define`] for embedding in a larger binary.
pub fn try_define<F>(logic: F) -> Result<(), Error>
where
    F: FnOnce(&Request, &mut Response),
{
    let stdin = std::io::stdin();
    let payload = if stdin.is_terminal() {
        log::debug!("no piped payload; starting from an empty request");
        None
    } else {
        let mut text = String::new();
        stdin.lock().read_to_string(&mut text)?;
        log::debug!("read {} bytes of piped payload", text.len());
        Some(text)
    };

    let request = request_from(&Parser::new(), payload.as_deref(), env::args().skip(1))?;
    let mut response = Response::new();
    logic(&request, &mut response);
    Ok(())
}

/// Assemble a request from an optional raw payload and an argument list.
///
/// This is [`define`] minus the process surfaces; custom harnesses and
/// tests feed it directly.
pub fn request_from(
    parser: &Parser,
    payload: Option<&str>,
    args: impl IntoIterator<Item = String>,
) -> Result<Request, Error> {
    let mut request = match payload {
        Some(text) => parser.parse_str(text)?,
        None => Request::new(),
    };

    for (key, value) in parse_args(args) {
        request.params_mut().insert(key, Value::String(value));
    }
    Ok(request)
}

/// Split arguments of the form `key=value` / `--key=value` on the first
/// `=`; anything that does not match is silently ignored.
fn parse_args(args: impl IntoIterator<Item = String>) -> Vec<(String, String)> {
    args.into_iter()
        .filter_map(|arg| {
            let (key, value) = arg.split_once('=')?;
            let key = key.strip_prefix("--").unwrap_or(key);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
