//! Image fetch boundary and decode helpers.
//!
//! The document controller never talks to the network directly; it goes
//! through the [`ImageFetcher`] trait so tests can substitute a scripted
//! fetcher. [`HttpFetcher`] is the production implementation: a single
//! GET of arbitrary bytes with transport timeouts.
//!
//! Decoding is separate from fetching because embedded backgrounds skip
//! the network entirely but share the same decode path.

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;

use std::time::Duration;

use async_trait::async_trait;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where the controller currently stands with its background image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No fetch in flight; the cached image (if any) matches the background.
    #[default]
    Idle,
    /// A remote fetch is in flight.
    Fetching,
    /// The last remote fetch for this URL failed (transport or decode).
    Failed(String),
}

/// Transport-level fetch failure. Recoverable: the user can retry or pick
/// a different background.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned status {0}")]
    Status(u16),
}

/// Fetched or embedded bytes are not a valid image.
#[derive(Debug, thiserror::Error)]
#[error("not a valid image: {0}")]
pub struct ImageDecodeError(String);

/// A decoded background image: dimensions plus tightly packed RGBA8
/// pixels. Kept crate-local so the public API carries no image-crate
/// types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode arbitrary bytes into a [`CanvasImage`].
pub fn decode_image(bytes: &[u8]) -> Result<CanvasImage, ImageDecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| ImageDecodeError(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    Ok(CanvasImage { width: rgba.width(), height: rgba.height(), rgba: rgba.into_raw() })
}

/// Boundary for fetching background-image bytes by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// GET the raw bytes behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with request and connect timeouts applied.
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
