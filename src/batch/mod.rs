//! Batch orchestration: drives the selected strategy over the whole locator
//! list and aggregates timing.

pub mod report;

use std::time::Instant;

pub use report::{BatchReport, FailureKind, FetchOutcome};

use crate::app::Result;
use crate::config::RunConfig;
use crate::strategy;

/// Execute every locator under the configured strategy.
///
/// Per-item lines are printed as units of work complete; the total line is
/// printed here once the whole batch has settled. Individual failures never
/// abort the batch.
pub fn run(locators: &[String], config: &RunConfig) -> Result<BatchReport> {
    tracing::info!(
        "downloading {} resources, strategy {:?}, width {}",
        locators.len(),
        config.strategy,
        config.width()
    );

    let start = Instant::now();
    let outcomes = strategy::run(locators, config)?;
    let report = BatchReport::new(outcomes, start.elapsed());

    println!("{}", report.summary_line());

    Ok(report)
}
