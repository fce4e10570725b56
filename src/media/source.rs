// SPDX-License-Identifier: MPL-2.0
//! Where an image to edit comes from.

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Source of the image being edited.
#[derive(Clone)]
pub enum ImageSource {
    /// Remote image fetched over HTTP(S).
    Url(String),
    /// Image file on disk.
    File(PathBuf),
    /// Already-loaded encoded bytes (e.g. an upload).
    Bytes(Vec<u8>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ImageSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl ImageSource {
    /// Short label for logs and diagnostics. Never includes raw bytes.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }

    /// `url`, `file` or `bytes`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Url(_) => "url",
            ImageSource::File(_) => "file",
            ImageSource::Bytes(_) => "bytes",
        }
    }

    /// Resolves the source into encoded image bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] if the URL cannot be fetched or answers with a
    ///   non-success status
    /// - [`Error::Io`] if the file cannot be read
    pub async fn fetch(self, client: &reqwest::Client) -> Result<Vec<u8>> {
        match self {
            ImageSource::Bytes(bytes) => Ok(bytes),
            ImageSource::File(path) => Ok(tokio::fs::read(&path).await?),
            ImageSource::Url(url) => {
                let response = client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Network(format!("{url} answered {status}")));
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn bytes_source_passes_through() {
        let client = reqwest::Client::new();
        let bytes = ImageSource::Bytes(vec![1, 2, 3])
            .fetch(&client)
            .await
            .expect("bytes source should resolve");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn file_source_reads_from_disk() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("upload.bin");
        std::fs::write(&path, b"payload").expect("failed to write file");

        let client = reqwest::Client::new();
        let bytes = ImageSource::File(path)
            .fetch(&client)
            .await
            .expect("file source should resolve");
        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn missing_file_returns_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let client = reqwest::Client::new();
        match ImageSource::File(temp_dir.path().join("missing.png"))
            .fetch(&client)
            .await
        {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn debug_hides_byte_payload() {
        let source = ImageSource::Bytes(vec![0; 2048]);
        assert_eq!(format!("{source:?}"), "Bytes(2048 bytes)");
        assert_eq!(source.describe(), "<2048 bytes>");
    }
}
