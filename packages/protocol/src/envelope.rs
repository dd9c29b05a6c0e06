//! Wire-format model for block payloads.
//!
//! A payload is a JSON object. An object carrying a truthy
//! `_blockspring_spec` key is a *spec envelope* and its reserved keys
//! (`_errors`, `_headers`) get control semantics; any other object is a
//! plain input map and every key passes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker key that tags an object as a spec envelope.
pub const SPEC_KEY: &str = "_blockspring_spec";

/// Reserved envelope key carrying structured error records.
pub const ERRORS_KEY: &str = "_errors";

/// Reserved envelope key carrying transport headers.
pub const HEADERS_KEY: &str = "_headers";

/// A decoded payload, classified by the presence of the spec marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Object with a truthy [`SPEC_KEY`]; reserved keys apply.
    Spec(Map<String, Value>),
    /// Any other object; all keys are ordinary inputs.
    Plain(Map<String, Value>),
}

impl Envelope {
    /// Classify a decoded value. Returns `None` for anything that is not a
    /// JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                if map.get(SPEC_KEY).is_some_and(is_truthy) {
                    Some(Envelope::Spec(map))
                } else {
                    Some(Envelope::Plain(map))
                }
            }
            _ => None,
        }
    }
}

/// The marker is tested for truth, not for type: only `null` and `false`
/// fail the test, matching the wire protocol's behavior for values like
/// `1` or `"true"`.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// One entry of an `_errors` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorRecord {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorRecord {
    pub fn new(title: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            title: title.into(),
            message: message.map(str::to_string),
        }
    }

    /// Accept an `_errors` element: an object with a string `title`.
    /// Anything else is dropped by the caller without signal. A `message`
    /// of the wrong type degrades to absent rather than rejecting the
    /// record.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let title = map.get("title")?.as_str()?.to_string();
        let message = map.get("message").and_then(Value::as_str).map(str::to_string);
        Some(Self { title, message })
    }
}

/// A file-shaped input awaiting materialization: a filename plus inline
/// base64 `data` or a remote `url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileReference {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileReference {
    /// Reference carrying inline base64 data.
    pub fn inline(filename: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            data: Some(data.into()),
            url: None,
        }
    }

    /// Reference pointing at a remote URL.
    pub fn remote(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            data: None,
            url: Some(url.into()),
        }
    }

    /// Recognize the attachment shape inside a payload value.
    ///
    /// Requires a non-empty string `filename` and a non-empty string
    /// `data` or `url`; unknown keys are ignored. Values that miss the
    /// shape are ordinary inputs and must be copied through verbatim.
    pub fn detect(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let filename = map
            .get("filename")?
            .as_str()
            .filter(|name| !name.is_empty())?;
        let data = map
            .get("data")
            .and_then(Value::as_str)
            .filter(|data| !data.is_empty());
        let url = map
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty());
        if data.is_none() && url.is_none() {
            return None;
        }
        Some(Self {
            filename: filename.to_string(),
            data: data.map(str::to_string),
            url: url.map(str::to_string),
        })
    }
}
