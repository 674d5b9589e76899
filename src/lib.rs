//! # Sluice
//!
//! A concurrent batch downloader: fetch a list of remote resources and write
//! each to local storage, reporting per-item and total timing.
//!
//! ## Architecture
//!
//! ```text
//! Batch Runner → Strategy → (Fetcher → Writer) per item
//! ```
//!
//! One unit of work is the fetch-then-write operation for exactly one
//! locator. The selected strategy schedules the units; every unit produces
//! exactly one outcome, and no unit's failure reaches another. The batch
//! always runs to completion.
//!
//! ## Quick Start
//!
//! ```bash
//! # Default thread pool, four workers
//! sluice http://x/a.png http://x/b.png
//!
//! # Eight isolated worker processes
//! sluice --strategy multiprocess --processes 8 http://x/a.png
//!
//! # Cooperative single-threaded fan-out
//! sluice --async http://x/a.png http://x/b.png
//! ```

/// Error types and the crate-wide `Result` alias.
pub mod app;

/// Batch orchestration and the outcome/report types.
pub mod batch;

/// Command-line interface using clap.
pub mod cli;

/// Run configuration: strategy selection, widths, optional defaults file.
pub mod config;

/// Resource fetching over HTTP.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for the cooperative path
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): shared-session implementation
/// - [`BlockingFetcher`](fetcher::blocking::BlockingFetcher): per-worker synchronous client
pub mod fetcher;

/// The three interchangeable concurrency strategies.
///
/// - [`threaded`](strategy::threaded): fixed worker-thread pool over a shared queue
/// - [`process_pool`](strategy::process_pool): fixed pool of isolated worker processes
/// - [`cooperative`](strategy::cooperative): single-threaded fan-out, semaphore bounded
pub mod strategy;

/// Worker-mode entry point for the multiprocess strategy.
pub mod worker;

/// Local persistence of fetched payloads.
pub mod writer;
