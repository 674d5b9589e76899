//! Interchangeable execution policies for a batch of fetch+write units.
//!
//! All three variants share one contract: given the locator list and the run
//! configuration, produce exactly one [`FetchOutcome`] per locator. Outcome
//! ordering is unspecified and progress lines may interleave.

pub mod cooperative;
pub mod process_pool;
pub mod threaded;

use std::time::Instant;

use crate::app::Result;
use crate::batch::report::FetchOutcome;
use crate::config::{RunConfig, Strategy};
use crate::fetcher::blocking::BlockingFetcher;
use crate::fetcher::Fetcher;
use crate::writer::Writer;

/// Execute the whole batch under the configured strategy.
pub fn run(locators: &[String], config: &RunConfig) -> Result<Vec<FetchOutcome>> {
    match config.strategy {
        Strategy::Threaded => threaded::run(locators, config),
        Strategy::Multiprocess => process_pool::run(locators, config),
        Strategy::Cooperative => {
            // Single logical thread of control; tasks suspend at network reads
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            Ok(rt.block_on(cooperative::run(locators, config)))
        }
    }
}

/// One synchronous unit of work: fetch `locator`, write the payload.
///
/// Failures never escape; they become the unit's outcome. Elapsed time spans
/// the fetch and the write, not time spent queued.
pub(crate) fn blocking_unit(
    fetcher: &BlockingFetcher,
    writer: &Writer,
    locator: &str,
) -> FetchOutcome {
    let start = Instant::now();

    match fetcher.fetch(locator).and_then(|body| writer.write(locator, &body)) {
        Ok((file_name, bytes)) => FetchOutcome::Downloaded {
            locator: locator.to_string(),
            file_name,
            bytes,
            elapsed: start.elapsed(),
        },
        Err(e) => {
            tracing::debug!("unit of work failed for {}: {}", locator, e);
            FetchOutcome::failed(locator, &e)
        }
    }
}

/// Async twin of [`blocking_unit`] for the cooperative strategy.
pub(crate) async fn async_unit(
    fetcher: &(dyn Fetcher + Send + Sync),
    writer: &Writer,
    locator: &str,
) -> FetchOutcome {
    let start = Instant::now();

    let result = match fetcher.fetch(locator).await {
        Ok(body) => writer.write(locator, &body),
        Err(e) => Err(e),
    };

    match result {
        Ok((file_name, bytes)) => FetchOutcome::Downloaded {
            locator: locator.to_string(),
            file_name,
            bytes,
            elapsed: start.elapsed(),
        },
        Err(e) => {
            tracing::debug!("unit of work failed for {}: {}", locator, e);
            FetchOutcome::failed(locator, &e)
        }
    }
}
