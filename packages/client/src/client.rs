//! Remote block invocation.

use std::env;

use serde_json::{Map, Value};
use url::Url;

use blockspring_protocol::{HEADERS_KEY, Parser, Request};

use crate::error::Error;

/// Production execution endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sender.blockspring.com";

/// Environment variable holding the default API key.
pub const API_KEY_VAR: &str = "BLOCKSPRING_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_VAR: &str = "BLOCKSPRING_URL";

/// Decoded body of a [`Client::run`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutput {
    /// Body decoded as JSON.
    Json(Value),
    /// Body was not valid JSON; returned verbatim.
    Text(String),
}

impl BlockOutput {
    pub fn into_json(self) -> Option<Value> {
        match self {
            BlockOutput::Json(value) => Some(value),
            BlockOutput::Text(_) => None,
        }
    }
}

/// Decoded body of a [`Client::run_parsed`] call.
#[derive(Debug)]
pub enum ParsedOutput {
    /// JSON object response, run back through the envelope parser with
    /// the transport headers attached under `_headers`. File outputs in
    /// the response resolve to local paths exactly like request inputs.
    Block(Request),
    /// JSON response that was not an object.
    Json(Value),
    /// Body that was not valid JSON.
    Text(String),
}

/// Caller-side client for remote block execution.
///
/// Inputs are POSTed as JSON to
/// `{base}/api_v2/blocks/{block}?api_key={key}`. A non-2xx response is
/// handled like any other response: its body goes down the same
/// decode-or-passthrough path, so remote error envelopes surface as data
/// rather than transport failures.
pub struct Client {
    http: reqwest::blocking::Client,
    parser: Parser,
    base_url: Url,
    api_key: String,
}

impl Client {
    /// Client against an explicit base URL with no API key.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            parser: Parser::new(),
            base_url: Url::parse(base_url)?,
            api_key: String::new(),
        })
    }

    /// Client configured from the environment: `BLOCKSPRING_API_KEY` for
    /// the key (empty when unset) and `BLOCKSPRING_URL` for the base URL,
    /// defaulting to the production endpoint. The override is honored on
    /// the wire.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = Self::new(&base_url)?;
        Ok(match env::var(API_KEY_VAR) {
            Ok(api_key) => client.with_api_key(api_key),
            Err(_) => client,
        })
    }

    /// Explicit API key; takes precedence over the environment.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    fn post_block(&self, block: &str, data: &Value) -> Result<reqwest::blocking::Response, Error> {
        if !data.is_object() {
            return Err(Error::NotADictionary);
        }

        // A namespaced identifier like "myns/block1" targets its last
        // segment.
        let block = block.rsplit('/').next().unwrap_or(block);
        let url = format!(
            "{}/api_v2/blocks/{block}",
            self.base_url.as_str().trim_end_matches('/')
        );

        log::debug!("invoking block {block} at {url}");
        let response = self
            .http
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .json(data)
            .send()?;
        Ok(response)
    }

    /// Invoke a remote block and decode its response body.
    pub fn run(&self, block: &str, data: &Value) -> Result<BlockOutput, Error> {
        let response = self.post_block(block, data)?;
        let body = response.text()?;
        Ok(match serde_json::from_str(&body) {
            Ok(value) => BlockOutput::Json(value),
            Err(_) => BlockOutput::Text(body),
        })
    }

    /// Invoke a remote block and resolve its response through the
    /// envelope parser.
    ///
    /// Object responses get the transport headers attached under
    /// `_headers` and are re-parsed as payloads, making the protocol
    /// symmetric: a response may itself carry file references and error
    /// records.
    pub fn run_parsed(&self, block: &str, data: &Value) -> Result<ParsedOutput, Error> {
        let response = self.post_block(block, data)?;

        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), Value::String(v.to_string())))
            })
            .collect();

        let body = response.text()?;
        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => return Ok(ParsedOutput::Text(body)),
        };
        let mut map = match value {
            Value::Object(map) => map,
            other => return Ok(ParsedOutput::Json(other)),
        };

        map.insert(HEADERS_KEY.to_string(), Value::Object(headers));
        let request = self.parser.parse_value(Value::Object(map))?;
        Ok(ParsedOutput::Block(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_data_is_rejected() {
        let client = Client::new("http://localhost:9").unwrap();
        for data in [json!([1]), json!("x"), json!(5), json!(null)] {
            let error = client.run("block", &data).unwrap_err();
            assert!(matches!(error, Error::NotADictionary), "data {data:?}");
        }
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(matches!(Client::new("not a url"), Err(Error::BaseUrl(_))));
    }

    #[test]
    fn block_output_into_json() {
        assert_eq!(
            BlockOutput::Json(json!({"y": 2})).into_json(),
            Some(json!({"y": 2}))
        );
        assert_eq!(BlockOutput::Text("raw".to_string()).into_json(), None);
    }
}
