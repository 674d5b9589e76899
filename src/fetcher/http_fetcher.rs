use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::Fetcher;

/// Async fetcher over a single shared connection pool. The cooperative
/// strategy issues every fetch through one instance of this.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout: None` means requests wait forever.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent("sluice/0.1.0");

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        let response = self.client.get(locator).send().await?;
        let response = response.error_for_status()?;
        let body = response.bytes().await?.to_vec();

        Ok(body)
    }
}
