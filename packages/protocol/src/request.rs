//! Parsed invocation inputs.

use serde_json::{Map, Value};
use tempfile::TempPath;

use crate::envelope::ErrorRecord;

/// Inputs for one block invocation.
///
/// Produced by [`Parser`](crate::Parser) and consumed by block logic.
/// File inputs appear in `params` as paths to temporary files owned by
/// this request; those files are deleted when the request is dropped, so
/// keep the request alive while reading them.
///
/// `errors` and `headers` are read-only once parsing completes; `params`
/// stays writable so command-line arguments can be layered on top of a
/// piped payload.
#[derive(Debug, Default)]
pub struct Request {
    params: Map<String, Value>,
    errors: Vec<ErrorRecord>,
    headers: Map<String, Value>,
    attachments: Vec<TempPath>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Named inputs, with file references replaced by local paths.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.params
    }

    /// Error records forwarded by the caller, in payload order.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Headers from the last `_headers` entry seen.
    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    pub(crate) fn set_params(&mut self, params: Map<String, Value>) {
        self.params = params;
    }

    pub(crate) fn push_error(&mut self, error: ErrorRecord) {
        self.errors.push(error);
    }

    /// Replaces the header map wholesale; headers are not merged.
    pub(crate) fn set_headers(&mut self, headers: Map<String, Value>) {
        self.headers = headers;
    }

    /// Take ownership of a materialized attachment so its lifetime
    /// matches the request's.
    pub(crate) fn adopt_attachment(&mut self, attachment: TempPath) {
        self.attachments.push(attachment);
    }
}
