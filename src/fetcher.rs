//! Fetches generated images from the remote text-to-image endpoint.

use std::future::Future;
use std::io::Cursor;
use std::time::Duration;

use image::DynamicImage;
use reqwest::StatusCode;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::GenerationError;

/// Something that can turn a composed prompt into an image.
pub trait ImageSource {
    /// Fetches one image for the prompt. No retries.
    fn fetch_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<DynamicImage, GenerationError>> + Send;
}

/// Errors raised while building a fetcher.
#[derive(Debug)]
pub enum FetcherError {
    /// The base URL could not be parsed or can't carry a path.
    InvalidBaseUrl(String),
    /// The HTTP client could not be built.
    Client(reqwest::Error),
}

impl std::fmt::Display for FetcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl(url) => write!(f, "Invalid image API base URL: {url}"),
            Self::Client(err) => write!(f, "Failed to build HTTP client: {err}"),
        }
    }
}

impl std::error::Error for FetcherError {}

/// GETs `<base_url><percent-encoded prompt>` and decodes the body.
#[derive(Clone, Debug)]
pub struct ImageFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl ImageFetcher {
    /// Builds a fetcher with its own client using `timeout` for every request.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, FetcherError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetcherError::Client)?;
        Self::with_client(base_url, client)
    }

    /// Builds a fetcher around an existing client.
    pub fn with_client(base_url: &Url, client: reqwest::Client) -> Result<Self, FetcherError> {
        if base_url.cannot_be_a_base() {
            return Err(FetcherError::InvalidBaseUrl(base_url.to_string()));
        }
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { base_url, client })
    }

    /// The endpoint prompts are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full request URL for a prompt. Everything outside the unreserved
    /// set is percent-encoded, so the prompt occupies exactly one path segment.
    pub fn image_url(&self, prompt: &str) -> String {
        format!("{}{}", self.base_url, urlencoding::encode(prompt))
    }

    /// One GET, bounded by the client timeout.
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    pub async fn fetch(&self, prompt: &str) -> Result<DynamicImage, GenerationError> {
        let url = self.image_url(prompt);
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            info!("Image endpoint returned {}", status);
            return Err(GenerationError::RemoteStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        debug!("Received {} bytes", bytes.len());
        decode_image(&bytes)
    }
}

impl ImageSource for ImageFetcher {
    fn fetch_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<DynamicImage, GenerationError>> + Send {
        self.fetch(prompt)
    }
}

/// Decodes a response body, sniffing the format from its bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, GenerationError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| GenerationError::Transport(err.to_string()))?;
    reader.decode().map_err(|err| {
        debug!("Failed to decode image: {}", err);
        GenerationError::Transport(err.to_string())
    })
}
