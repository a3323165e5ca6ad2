use image::DynamicImage;
use moka::future::Cache;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching a product image
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} fetching {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

/// Downloads and decodes product images
///
/// Decoded images are cached in memory keyed by URL so repeated match
/// calls against the same listings do not re-download.
pub struct ImageFetcher {
    client: Client,
    cache: Cache<String, Arc<DynamicImage>>,
}

impl ImageFetcher {
    pub fn new(timeout_secs: u64, cache_capacity: u64, cache_ttl_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let cache = Cache::builder()
            .max_capacity(cache_capacity)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self { client, cache }
    }

    /// Fetch and decode the image at `url`, consulting the cache first
    pub async fn fetch(&self, url: &str) -> Result<Arc<DynamicImage>, FetchError> {
        if let Some(image) = self.cache.get(url).await {
            tracing::trace!("image cache hit: {}", url);
            return Ok(image);
        }

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let image = image::load_from_memory(&bytes).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            source: e,
        })?;

        let image = Arc::new(image);
        self.cache.insert(url.to_string(), image.clone()).await;

        tracing::trace!("image fetched and cached: {}", url);
        Ok(image)
    }

    /// Number of decoded images currently cached
    pub fn cached_images(&self) -> u64 {
        self.cache.entry_count()
    }
}
