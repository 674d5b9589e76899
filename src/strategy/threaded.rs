//! Fixed-size pool of worker threads draining a shared queue.

use std::thread;

use crossbeam::channel;

use crate::app::Result;
use crate::batch::report::FetchOutcome;
use crate::config::RunConfig;
use crate::fetcher::blocking::BlockingFetcher;
use crate::writer::Writer;

/// Run the batch on `config.thread_width` worker threads. Each worker owns
/// its own blocking client and performs fetch+write synchronously per item.
/// The pool shuts down only after every item has completed.
pub fn run(locators: &[String], config: &RunConfig) -> Result<Vec<FetchOutcome>> {
    let width = config.thread_width.max(1);
    let (work_tx, work_rx) = channel::unbounded::<String>();
    let (done_tx, done_rx) = channel::unbounded::<FetchOutcome>();

    for locator in locators {
        work_tx.send(locator.clone()).expect("work queue closed");
    }
    // Closing the sending side lets workers drain the queue and exit
    drop(work_tx);

    let mut handles = Vec::new();
    for id in 0..width {
        let work_rx = work_rx.clone();
        let done_tx = done_tx.clone();
        let writer = Writer::new(config.output_dir.clone(), config.disambiguate);
        let timeout = config.timeout;

        handles.push(thread::spawn(move || {
            let fetcher = BlockingFetcher::new(timeout);

            while let Ok(locator) = work_rx.recv() {
                tracing::debug!("worker {} picked up {}", id, locator);
                let outcome = super::blocking_unit(&fetcher, &writer, &locator);
                println!("{}", outcome.progress_line());

                if done_tx.send(outcome).is_err() {
                    break;
                }
            }
        }));
    }
    drop(done_tx);

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("worker thread panicked");
        }
    }

    Ok(done_rx.iter().collect())
}
