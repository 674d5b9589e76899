use std::time::Duration;

use reqwest::blocking::Client;

use crate::app::Result;

/// Synchronous counterpart of [`HttpFetcher`](crate::fetcher::http_fetcher::HttpFetcher)
/// for pool workers. Each worker thread or process owns its own instance;
/// nothing is shared between workers.
pub struct BlockingFetcher {
    client: Client,
}

impl BlockingFetcher {
    /// `timeout: None` means requests wait forever. The blocking client ships
    /// with a 30 second default timeout, so it must be unset explicitly.
    pub fn new(timeout: Option<Duration>) -> Self {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent("sluice/0.1.0")
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    pub fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        let response = self.client.get(locator).send()?;
        let response = response.error_for_status()?;
        let body = response.bytes()?.to_vec();

        Ok(body)
    }
}
