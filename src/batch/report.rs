use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::SluiceError;

/// Failure classification carried in a [`FetchOutcome`].
///
/// `Worker` covers outcomes synthesized when a worker process or task died
/// before reporting; the unit of work itself never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    HttpStatus,
    Io,
    Worker,
}

impl FailureKind {
    pub fn of(err: &SluiceError) -> Self {
        match err {
            SluiceError::Http(e) if e.is_status() => FailureKind::HttpStatus,
            SluiceError::Http(_) => FailureKind::Network,
            SluiceError::Io(_) | SluiceError::InvalidUrl(_) | SluiceError::NoFileName(_) => {
                FailureKind::Io
            }
            SluiceError::Serialize(_) | SluiceError::Worker(_) => FailureKind::Worker,
        }
    }
}

/// The result of exactly one unit of work. Serialized as one JSON line on the
/// multiprocess wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Downloaded {
        locator: String,
        file_name: String,
        bytes: u64,
        elapsed: Duration,
    },
    Failed {
        locator: String,
        kind: FailureKind,
        detail: String,
    },
}

impl FetchOutcome {
    pub fn failed(locator: &str, err: &SluiceError) -> Self {
        Self::Failed {
            locator: locator.to_string(),
            kind: FailureKind::of(err),
            detail: err.to_string(),
        }
    }

    pub fn locator(&self) -> &str {
        match self {
            Self::Downloaded { locator, .. } | Self::Failed { locator, .. } => locator,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Downloaded { elapsed, .. } => Some(*elapsed),
            Self::Failed { .. } => None,
        }
    }

    /// The line printed to stdout when this unit of work completes.
    pub fn progress_line(&self) -> String {
        match self {
            Self::Downloaded {
                file_name, elapsed, ..
            } => format!(
                "Downloaded {} in {:.2} seconds",
                file_name,
                elapsed.as_secs_f64()
            ),
            Self::Failed {
                locator, detail, ..
            } => format!("Failed to download {}: {}", locator, detail),
        }
    }
}

/// Aggregate of all outcomes plus total wall-clock time for one run.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<FetchOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn new(outcomes: Vec<FetchOutcome>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    pub fn downloaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.downloaded()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Total execution time: {:.2} seconds",
            self.elapsed.as_secs_f64()
        )
    }
}
