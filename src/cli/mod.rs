use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{
    FileConfig, RunConfig, Strategy, DEFAULT_PROCESS_WIDTH, DEFAULT_THREAD_WIDTH,
};

#[derive(Parser, Debug)]
#[command(name = "sluice")]
#[command(about = "A concurrent batch downloader", long_about = None)]
pub struct Cli {
    /// URLs of the resources to download
    #[arg(required_unless_present = "worker")]
    pub urls: Vec<String>,

    /// Worker threads for the threaded strategy [default: 4]
    #[arg(long)]
    pub threads: Option<usize>,

    /// Worker processes for the multiprocess strategy [default: 4]
    #[arg(long)]
    pub processes: Option<usize>,

    /// Download cooperatively on a single thread (same as --strategy cooperative)
    #[arg(long = "async", conflicts_with = "strategy")]
    pub use_async: bool,

    /// Concurrency strategy to run the batch under [default: threaded]
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Per-request timeout in seconds; requests wait forever when unset
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory downloads are written into [default: current directory]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix each file name with a digest of its URL to avoid collisions
    #[arg(long)]
    pub disambiguate: bool,

    /// Run as a pool worker, reading locators from stdin (internal)
    #[arg(long, hide = true)]
    pub worker: bool,
}

impl Cli {
    /// Resolve flags and config-file defaults into a [`RunConfig`].
    /// Flags win; file values fill the gaps.
    pub fn run_config(&self, file: &FileConfig) -> RunConfig {
        let strategy = if self.use_async {
            Strategy::Cooperative
        } else {
            self.strategy
                .or(file.strategy)
                .unwrap_or(Strategy::Threaded)
        };

        RunConfig {
            strategy,
            thread_width: self
                .threads
                .or(file.threads)
                .unwrap_or(DEFAULT_THREAD_WIDTH)
                .max(1),
            process_width: self
                .processes
                .or(file.processes)
                .unwrap_or(DEFAULT_PROCESS_WIDTH)
                .max(1),
            timeout: self
                .timeout
                .or(file.timeout_secs)
                .map(Duration::from_secs),
            output_dir: self
                .output_dir
                .clone()
                .or_else(|| file.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            disambiguate: self.disambiguate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sluice", "http://x/a.png"]).unwrap();
        let config = cli.run_config(&FileConfig::default());

        assert_eq!(cli.urls, vec!["http://x/a.png"]);
        assert_eq!(config.strategy, Strategy::Threaded);
        assert_eq!(config.thread_width, DEFAULT_THREAD_WIDTH);
        assert_eq!(config.process_width, DEFAULT_PROCESS_WIDTH);
        assert_eq!(config.timeout, None);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_async_flag_selects_cooperative() {
        let cli = Cli::try_parse_from(["sluice", "--async", "http://x/a.png"]).unwrap();
        let config = cli.run_config(&FileConfig::default());
        assert_eq!(config.strategy, Strategy::Cooperative);
    }

    #[test]
    fn test_async_conflicts_with_strategy() {
        assert!(Cli::try_parse_from([
            "sluice",
            "--async",
            "--strategy",
            "threaded",
            "http://x/a.png"
        ])
        .is_err());
    }

    #[test]
    fn test_urls_required() {
        assert!(Cli::try_parse_from(["sluice"]).is_err());
        assert!(Cli::try_parse_from(["sluice", "--worker"]).is_ok());
    }

    #[test]
    fn test_flags_override_file_config() {
        let cli = Cli::try_parse_from(["sluice", "--threads", "2", "http://x/a.png"]).unwrap();
        let file = FileConfig {
            threads: Some(16),
            processes: Some(8),
            timeout_secs: Some(30),
            ..FileConfig::default()
        };
        let config = cli.run_config(&file);

        assert_eq!(config.thread_width, 2);
        assert_eq!(config.process_width, 8);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_width_clamped() {
        let cli = Cli::try_parse_from(["sluice", "--threads", "0", "http://x/a.png"]).unwrap();
        let config = cli.run_config(&FileConfig::default());
        assert_eq!(config.thread_width, 1);
    }
}
