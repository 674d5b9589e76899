pub mod blocking;
pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Fetches one remote resource, reading the whole body into memory.
///
/// Implementations surface transport failures and non-success statuses as
/// errors; partial content is never returned. Locator syntax is not
/// validated here, a bad address simply fails to connect.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>>;
}
