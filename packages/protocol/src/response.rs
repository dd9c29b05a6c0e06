//! Result accumulation and emission.

use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value, json};

use crate::envelope::{ERRORS_KEY, SPEC_KEY};
use crate::error::Error;

/// Accumulates named outputs and errors for one invocation.
///
/// The result map is born as a spec envelope (`_blockspring_spec: true`,
/// `_errors: []`). Outputs overwrite by key with no protection for the
/// reserved keys; a caller that writes `_errors` gets exactly what it
/// asked for.
#[derive(Debug)]
pub struct Response {
    result: Map<String, Value>,
}

impl Response {
    pub fn new() -> Self {
        let mut result = Map::new();
        result.insert(SPEC_KEY.to_string(), Value::Bool(true));
        result.insert(ERRORS_KEY.to_string(), Value::Array(Vec::new()));
        Self { result }
    }

    /// Set a named output. Last write wins.
    pub fn add_output(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.result.insert(name.into(), value.into());
        self
    }

    /// Set a named file output.
    ///
    /// Reads the file whole, base64-encodes it, and derives a content
    /// type from the filename extension (JSON `null` when the extension
    /// resolves to nothing). Read failures propagate; this is the one
    /// place the builder can fail.
    pub fn add_file_output(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self, Error> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = std::fs::read(path)?;
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());

        self.result.insert(
            name.into(),
            json!({
                "filename": filename,
                "content-type": content_type,
                "data": STANDARD.encode(&contents),
            }),
        );
        Ok(self)
    }

    /// Append an error record to the `_errors` array.
    pub fn add_error_output(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
    ) -> &mut Self {
        let title: String = title.into();
        let errors = self
            .result
            .entry(ERRORS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = errors {
            list.push(json!({
                "title": title,
                "message": message,
            }));
        }
        self
    }

    /// The accumulated result map.
    pub fn result(&self) -> &Map<String, Value> {
        &self.result
    }

    /// Serialize the accumulated state as one JSON line.
    ///
    /// Callable more than once; each call re-emits the full state.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        serde_json::to_writer(&mut writer, &self.result)?;
        writer.write_all(b"\n")
    }

    /// Emit the result envelope on standard output.
    pub fn end(&self) {
        let stdout = io::stdout();
        if let Err(error) = self.write_to(stdout.lock()) {
            log::error!("failed to emit result envelope: {error}");
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
