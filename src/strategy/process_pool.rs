//! Fixed pool of isolated worker processes.
//!
//! The parent re-executes the current binary in worker mode and dispatches
//! locators round-robin, one per stdin line. Workers answer with one
//! JSON-encoded outcome per stdout line; see [`crate::worker`] for the child
//! side. Workers share nothing with the parent or each other beyond the
//! filesystem namespace; each owns its own network client.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::thread;

use crate::app::{Result, SluiceError};
use crate::batch::report::FetchOutcome;
use crate::config::RunConfig;

pub fn run(locators: &[String], config: &RunConfig) -> Result<Vec<FetchOutcome>> {
    if locators.is_empty() {
        return Ok(Vec::new());
    }

    let width = config.process_width.max(1).min(locators.len());
    let assigned = assign(locators, width);

    let mut workers = Vec::with_capacity(width);
    for _ in 0..width {
        workers.push(spawn_worker(config)?);
    }

    // Readers drain stdout while items are still being dispatched, so a
    // worker never stalls on a full pipe
    let mut readers = Vec::new();
    for worker in &mut workers {
        let stdout = worker.stdout.take().expect("worker stdout piped");

        readers.push(thread::spawn(move || {
            let mut outcomes = Vec::new();
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<FetchOutcome>(&line) {
                    Ok(outcome) => {
                        println!("{}", outcome.progress_line());
                        outcomes.push(outcome);
                    }
                    Err(e) => tracing::error!("unparseable worker outcome: {}", e),
                }
            }
            outcomes
        }));
    }

    for (worker, batch) in workers.iter_mut().zip(&assigned) {
        let mut stdin = worker.stdin.take().expect("worker stdin piped");
        for locator in batch {
            if let Err(e) = writeln!(stdin, "{}", locator) {
                // The worker died; its items are backfilled after the join
                tracing::warn!("failed to dispatch to worker: {}", e);
                break;
            }
        }
        // Dropping stdin closes the pipe; the worker exits once drained
    }

    for worker in &mut workers {
        match worker.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!("worker exited with {}", status);
            }
            Err(e) => tracing::error!("failed to reap worker: {}", e),
            Ok(_) => {}
        }
    }

    let mut results = Vec::new();
    for (reader, batch) in readers.into_iter().zip(&assigned) {
        let outcomes = match reader.join() {
            Ok(outcomes) => outcomes,
            Err(_) => {
                tracing::error!("worker reader thread panicked");
                Vec::new()
            }
        };
        results.extend(backfill(outcomes, batch));
    }

    Ok(results)
}

/// Distribute locators round-robin across `width` workers.
fn assign(locators: &[String], width: usize) -> Vec<Vec<String>> {
    let mut assigned = vec![Vec::new(); width];
    for (i, locator) in locators.iter().enumerate() {
        assigned[i % width].push(locator.clone());
    }
    assigned
}

fn spawn_worker(config: &RunConfig) -> Result<Child> {
    let exe = std::env::current_exe()?;

    let mut cmd = Command::new(exe);
    cmd.arg("--worker");
    if let Some(timeout) = config.timeout {
        cmd.arg("--timeout").arg(timeout.as_secs().to_string());
    }
    cmd.arg("--output-dir").arg(&config.output_dir);
    if config.disambiguate {
        cmd.arg("--disambiguate");
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    Ok(cmd.spawn()?)
}

/// Every assigned locator owes the batch exactly one outcome. Anything a dead
/// worker never reported becomes a `Worker`-kind failure.
fn backfill(mut outcomes: Vec<FetchOutcome>, assigned: &[String]) -> Vec<FetchOutcome> {
    let missing: Vec<String> = {
        let mut reported: HashMap<&str, usize> = HashMap::new();
        for outcome in &outcomes {
            *reported.entry(outcome.locator()).or_default() += 1;
        }

        let mut missing = Vec::new();
        for locator in assigned {
            match reported.get_mut(locator.as_str()) {
                Some(n) if *n > 0 => *n -= 1,
                _ => missing.push(locator.clone()),
            }
        }
        missing
    };

    for locator in missing {
        let err = SluiceError::Worker("worker process exited before reporting".to_string());
        let outcome = FetchOutcome::failed(&locator, &err);
        println!("{}", outcome.progress_line());
        outcomes.push(outcome);
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::report::FailureKind;
    use std::time::Duration;

    fn url(n: usize) -> String {
        format!("http://x/{}.png", n)
    }

    #[test]
    fn test_round_robin_assignment_covers_all() {
        let locators: Vec<String> = (0..5).map(url).collect();
        let assigned = assign(&locators, 2);

        assert_eq!(assigned.len(), 2);
        assert_eq!(assigned[0], vec![url(0), url(2), url(4)]);
        assert_eq!(assigned[1], vec![url(1), url(3)]);
    }

    #[test]
    fn test_assignment_with_more_workers_than_items() {
        let locators = vec![url(0)];
        let assigned = assign(&locators, 1);

        assert_eq!(assigned, vec![vec![url(0)]]);
    }

    #[test]
    fn test_backfill_fills_unreported_locators() {
        let assigned = vec![url(0), url(1)];
        let outcomes = vec![FetchOutcome::Downloaded {
            locator: url(0),
            file_name: "0.png".to_string(),
            bytes: 1,
            elapsed: Duration::from_millis(10),
        }];

        let results = backfill(outcomes, &assigned);

        assert_eq!(results.len(), 2);
        match &results[1] {
            FetchOutcome::Failed { locator, kind, .. } => {
                assert_eq!(locator, &url(1));
                assert_eq!(*kind, FailureKind::Worker);
            }
            other => panic!("expected backfilled failure, got {:?}", other),
        }
    }

    #[test]
    fn test_backfill_handles_duplicate_locators() {
        // The same locator assigned twice but reported once
        let assigned = vec![url(0), url(0)];
        let outcomes = vec![FetchOutcome::Downloaded {
            locator: url(0),
            file_name: "0.png".to_string(),
            bytes: 1,
            elapsed: Duration::from_millis(10),
        }];

        let results = backfill(outcomes, &assigned);

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|o| o.is_success()).count(), 1);
    }

    #[test]
    fn test_backfill_complete_report_is_untouched() {
        let assigned = vec![url(0)];
        let outcomes = vec![FetchOutcome::Downloaded {
            locator: url(0),
            file_name: "0.png".to_string(),
            bytes: 1,
            elapsed: Duration::from_millis(10),
        }];

        let results = backfill(outcomes, &assigned);

        assert_eq!(results.len(), 1);
        assert!(results[0].is_success());
    }
}
