//! Child-process side of the multiprocess strategy.
//!
//! Reads one locator per line on stdin, runs the fetch+write unit of work and
//! answers with one JSON-encoded outcome per stdout line. Stdout is protocol
//! only; the parent prints the human-readable progress lines. Exits once
//! stdin is drained.

use std::io::{self, BufRead, Write};

use crate::app::Result;
use crate::config::RunConfig;
use crate::fetcher::blocking::BlockingFetcher;
use crate::strategy;
use crate::writer::Writer;

pub fn run(config: &RunConfig) -> Result<()> {
    let fetcher = BlockingFetcher::new(config.timeout);
    let writer = Writer::new(config.output_dir.clone(), config.disambiguate);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let locator = line.trim();
        if locator.is_empty() {
            continue;
        }

        tracing::debug!("worker fetching {}", locator);
        let outcome = strategy::blocking_unit(&fetcher, &writer, locator);

        let encoded = serde_json::to_string(&outcome)?;
        out.write_all(encoded.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    Ok(())
}
