//! Single-threaded cooperative fan-out over one shared HTTP session.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::app::SluiceError;
use crate::batch::report::FetchOutcome;
use crate::config::RunConfig;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::writer::Writer;

/// Spawn one task per locator over a shared client and gather them with an
/// all-complete barrier. In-flight fetches are bounded by the thread width;
/// resumption order is I/O readiness, not submission order. One task failing
/// or aborting never cancels its siblings.
pub async fn run(locators: &[String], config: &RunConfig) -> Vec<FetchOutcome> {
    let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(config.timeout));
    let semaphore = Arc::new(Semaphore::new(config.thread_width.max(1)));

    let mut handles = Vec::new();
    for locator in locators {
        let fetcher = fetcher.clone();
        let semaphore = semaphore.clone();
        let writer = Writer::new(config.output_dir.clone(), config.disambiguate);
        let locator = locator.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.expect("Semaphore closed");

            let outcome = super::async_unit(fetcher.as_ref(), &writer, &locator).await;
            println!("{}", outcome.progress_line());
            outcome
        }));
    }

    let mut outcomes = Vec::new();
    for (result, locator) in join_all(handles).await.into_iter().zip(locators) {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                // A lost task still owes the batch its outcome
                tracing::error!("Task join error: {}", e);
                let err = SluiceError::Worker(format!("task aborted: {}", e));
                outcomes.push(FetchOutcome::failed(locator, &err));
            }
        }
    }

    outcomes
}
