//! Payload parsing.
//!
//! Turns a raw invocation payload into a [`Request`]. Plain objects pass
//! through untouched; spec envelopes get the reserved-key dispatch and
//! file materialization described in the crate docs.

use serde_json::Value;

use crate::attachment::{Fetcher, HttpFetcher, Materialized, materialize};
use crate::envelope::{ERRORS_KEY, Envelope, ErrorRecord, FileReference, HEADERS_KEY, SPEC_KEY};
use crate::error::Error;
use crate::request::Request;

/// Payload parser, configured with the fetcher used for `url`
/// attachments.
pub struct Parser {
    fetcher: Box<dyn Fetcher>,
}

impl Parser {
    /// Parser with the production HTTP fetcher.
    pub fn new() -> Self {
        Self {
            fetcher: Box::new(HttpFetcher::new()),
        }
    }

    /// Parser with a custom fetcher; tests use canned bytes here.
    pub fn with_fetcher(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
        }
    }

    /// Parse a raw JSON payload.
    pub fn parse_str(&self, text: &str) -> Result<Request, Error> {
        let value: Value = serde_json::from_str(text).map_err(Error::InvalidJson)?;
        self.parse_value(value)
    }

    /// Parse an already-decoded payload.
    ///
    /// Keys are visited in document order. A materialization failure on
    /// one key leaves every other key untouched.
    pub fn parse_value(&self, value: Value) -> Result<Request, Error> {
        let mut request = Request::new();
        match Envelope::from_value(value).ok_or(Error::NotAnObject)? {
            Envelope::Plain(map) => {
                // Fast path: no key is reserved, nothing resolves.
                request.set_params(map);
            }
            Envelope::Spec(map) => {
                for (key, value) in map {
                    if key == SPEC_KEY {
                        continue;
                    }
                    if key == ERRORS_KEY && value.is_array() {
                        if let Value::Array(entries) = value {
                            for entry in &entries {
                                if let Some(record) = ErrorRecord::from_value(entry) {
                                    request.push_error(record);
                                }
                            }
                        }
                        continue;
                    }
                    if key == HEADERS_KEY && value.is_object() {
                        if let Value::Object(headers) = value {
                            request.set_headers(headers);
                        }
                        continue;
                    }
                    // A mistyped `_errors`/`_headers` is an ordinary
                    // input from here on, file-shape detection included.
                    match FileReference::detect(&value) {
                        Some(reference) => {
                            match materialize(&reference, self.fetcher.as_ref()) {
                                Materialized::File(path) => {
                                    let location = path.to_string_lossy().into_owned();
                                    request.params_mut().insert(key, Value::String(location));
                                    request.adopt_attachment(path);
                                }
                                Materialized::Unresolved => {
                                    request.params_mut().insert(key, value);
                                }
                            }
                        }
                        None => {
                            request.params_mut().insert(key, value);
                        }
                    }
                }
            }
        }
        Ok(request)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
