//! Attachment materialization.
//!
//! File-shaped inputs arrive either as inline base64 `data` or as a
//! remote `url`. Either way the bytes land in a uniquely named temporary
//! file and the input is replaced by that file's path. Failures never
//! escape this module: a reference that cannot be materialized is handed
//! back to the caller unchanged, since block code has no recovery path
//! beyond seeing the original reference shape.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::TempPath;

use crate::envelope::FileReference;

/// Outcome of materializing a [`FileReference`].
///
/// The two-case shape is the contract: callers branch on it instead of
/// catching errors.
#[derive(Debug)]
pub enum Materialized {
    /// Bytes were written to a local temporary file. Dropping the
    /// [`TempPath`] deletes the file.
    File(TempPath),
    /// Decoding or fetching failed; the caller keeps the original
    /// reference.
    Unresolved,
}

impl Materialized {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Materialized::File(_))
    }
}

/// Remote side of `url` attachments.
///
/// Implementations can use real HTTP clients or canned bytes for tests.
pub trait Fetcher {
    /// Fetch the full body behind `url`, or an error message on any
    /// transport or status failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// Production fetcher backed by a blocking reqwest client.
///
/// No timeout is configured by default; the wire protocol defines none.
/// Pass a preconfigured client through [`HttpFetcher::with_client`] to
/// impose one.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;
        let response = response.error_for_status().map_err(|e| e.to_string())?;
        let bytes = response.bytes().map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

/// Materialize a reference into a local temporary file.
///
/// The file is created first, named with a `-<filename>` suffix for
/// debuggability. `data` wins over `url` when both are present. On any
/// failure the partially created file is discarded and the outcome is
/// [`Materialized::Unresolved`].
pub fn materialize(reference: &FileReference, fetcher: &dyn Fetcher) -> Materialized {
    let mut file = match tempfile::Builder::new()
        .suffix(&format!("-{}", reference.filename))
        .tempfile()
    {
        Ok(file) => file,
        Err(error) => {
            log::warn!(
                "could not create temp file for {}: {error}",
                reference.filename
            );
            return Materialized::Unresolved;
        }
    };

    let bytes = if let Some(data) = &reference.data {
        match decode_base64(data) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("bad base64 for {}: {error}", reference.filename);
                return Materialized::Unresolved;
            }
        }
    } else if let Some(url) = &reference.url {
        match fetcher.fetch(url) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("fetch of {url} failed: {error}");
                return Materialized::Unresolved;
            }
        }
    } else {
        // Detection guarantees data or url; a hand-built reference may not.
        return Materialized::Unresolved;
    };

    if let Err(error) = file.write_all(&bytes) {
        log::warn!("could not write {}: {error}", reference.filename);
        return Materialized::Unresolved;
    }

    log::debug!(
        "materialized {} ({} bytes) at {}",
        reference.filename,
        bytes.len(),
        file.path().display()
    );
    Materialized::File(file.into_temp_path())
}

/// Base64 decoding with a whitespace-stripping pre-pass.
///
/// Wire payloads commonly arrive with line-wrapped base64; the reference
/// decoder accepted those, so a strict decode would reject valid
/// traffic.
fn decode_base64(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(Vec<u8>);

    impl Fetcher for StaticFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, String> {
            Ok(self.0.clone())
        }
    }

    struct FailingFetcher;

    impl Fetcher for FailingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, String> {
            Err("connection refused".to_string())
        }
    }

    #[test]
    fn inline_data_lands_in_temp_file() {
        let reference = FileReference::inline("greeting.txt", STANDARD.encode(b"hi there"));
        match materialize(&reference, &FailingFetcher) {
            Materialized::File(path) => {
                assert_eq!(std::fs::read(&path).unwrap(), b"hi there");
                assert!(path.to_string_lossy().ends_with("-greeting.txt"));
            }
            Materialized::Unresolved => panic!("inline data must resolve"),
        }
    }

    #[test]
    fn data_wins_over_url() {
        let reference = FileReference {
            filename: "both.txt".to_string(),
            data: Some(STANDARD.encode(b"inline")),
            url: Some("http://unreachable.invalid/file".to_string()),
        };
        match materialize(&reference, &FailingFetcher) {
            Materialized::File(path) => assert_eq!(std::fs::read(&path).unwrap(), b"inline"),
            Materialized::Unresolved => panic!("data branch must win"),
        }
    }

    #[test]
    fn invalid_base64_is_unresolved() {
        let reference = FileReference::inline("bad.bin", "!!!not base64!!!");
        assert!(!materialize(&reference, &FailingFetcher).is_resolved());
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        let reference = FileReference::inline("wrapped.txt", "aGkg\ndGhl\ncmU=\n");
        match materialize(&reference, &FailingFetcher) {
            Materialized::File(path) => assert_eq!(std::fs::read(&path).unwrap(), b"hi there"),
            Materialized::Unresolved => panic!("wrapped base64 must resolve"),
        }
    }

    #[test]
    fn url_branch_uses_fetcher() {
        let reference = FileReference::remote("remote.bin", "http://example.test/remote.bin");
        match materialize(&reference, &StaticFetcher(vec![1, 2, 3])) {
            Materialized::File(path) => assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]),
            Materialized::Unresolved => panic!("fetch must resolve"),
        }
    }

    #[test]
    fn fetch_failure_is_unresolved() {
        let reference = FileReference::remote("remote.bin", "http://example.test/remote.bin");
        assert!(!materialize(&reference, &FailingFetcher).is_resolved());
    }

    #[test]
    fn temp_file_removed_on_drop() {
        let reference = FileReference::inline("ephemeral.txt", STANDARD.encode(b"x"));
        let location = match materialize(&reference, &FailingFetcher) {
            Materialized::File(path) => {
                let location = path.to_path_buf();
                assert!(location.exists());
                location
            }
            Materialized::Unresolved => panic!("must resolve"),
        };
        assert!(!location.exists());
    }
}
