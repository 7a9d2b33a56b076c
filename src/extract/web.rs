//! Web content fetching through a reader proxy.
//!
//! The proxy (a Jina-Reader-style endpoint) renders a page and returns its
//! readable text, which keeps HTML parsing out of this crate.

use crate::config::ExtractionSettings;
use crate::error::{KringkastError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Content-fetch capability.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the readable text of a web page.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetcher backed by a reader-proxy endpoint, with bounded retries.
pub struct ReaderProxyFetcher {
    client: reqwest::Client,
    reader_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl ReaderProxyFetcher {
    pub fn new(settings: &ExtractionSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.fetch_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            reader_url: settings.reader_url.clone(),
            attempts: settings.fetch_attempts.max(1),
            retry_delay: Duration::from_secs(settings.fetch_retry_delay_seconds),
        }
    }
}

#[async_trait]
impl ContentFetcher for ReaderProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let full_url = format!("{}{}", self.reader_url, url);
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            match self
                .client
                .get(&full_url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
            {
                Ok(response) => match response.text().await {
                    Ok(text) => {
                        debug!("Fetched {} characters from {}", text.len(), url);
                        return Ok(text);
                    }
                    Err(e) => last_error = e.to_string(),
                },
                Err(e) => last_error = e.to_string(),
            }

            if attempt < self.attempts {
                warn!(
                    "Fetch attempt {}/{} for {} failed: {}",
                    attempt, self.attempts, url, last_error
                );
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(KringkastError::Fetch {
            url: url.to_string(),
            attempts: self.attempts,
            message: last_error,
        })
    }
}
