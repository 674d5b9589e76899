//! Run configuration for Sluice.
//!
//! Defaults are read from `~/.config/sluice/config.toml` at startup. If the
//! file doesn't exist, a default configuration with comments is created.
//! Command-line flags always take precedence over file values.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_THREAD_WIDTH: usize = 4;
pub const DEFAULT_PROCESS_WIDTH: usize = 4;

/// The concurrency model a batch runs under. Selected once per run, never
/// stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fixed pool of worker threads draining a shared queue
    Threaded,
    /// Fixed pool of isolated worker processes
    Multiprocess,
    /// Single-threaded cooperative fan-out over one shared HTTP session
    Cooperative,
}

/// Resolved configuration for one batch run, passed into the batch runner.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub strategy: Strategy,
    pub thread_width: usize,
    pub process_width: usize,
    /// Per-request timeout. `None` means requests wait forever.
    pub timeout: Option<Duration>,
    pub output_dir: PathBuf,
    pub disambiguate: bool,
}

impl RunConfig {
    /// The worker width of the selected strategy. The cooperative strategy
    /// reuses the thread width as its in-flight permit budget.
    pub fn width(&self) -> usize {
        match self.strategy {
            Strategy::Threaded | Strategy::Cooperative => self.thread_width,
            Strategy::Multiprocess => self.process_width,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Threaded,
            thread_width: DEFAULT_THREAD_WIDTH,
            process_width: DEFAULT_PROCESS_WIDTH,
            timeout: None,
            output_dir: PathBuf::from("."),
            disambiguate: false,
        }
    }
}

/// Optional defaults loaded from the config file. Every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub threads: Option<usize>,
    pub processes: Option<usize>,
    pub strategy: Option<Strategy>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Load defaults from the default path.
    ///
    /// If the config file doesn't exist, creates a commented one and returns
    /// empty defaults. If the file exists but is invalid, returns an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/sluice/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("sluice").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r#"# Sluice configuration
#
# Every key is optional; command-line flags override these values.

# Worker threads for the threaded strategy. Also bounds how many fetches
# the cooperative strategy keeps in flight at once.
#threads = 4

# Worker processes for the multiprocess strategy.
#processes = 4

# Default strategy: "threaded", "multiprocess" or "cooperative".
#strategy = "threaded"

# Per-request timeout in seconds. When unset, requests wait forever.
#timeout_secs = 30

# Directory downloads are written into.
#output_dir = "."
"#
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = FileConfig::default_config_content();
        let config: FileConfig =
            toml::from_str(&content).expect("Default config should be valid TOML");

        // Everything is commented out, so nothing is set
        assert!(config.threads.is_none());
        assert!(config.strategy.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
threads = 8
strategy = "cooperative"
"#;
        let config: FileConfig = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.threads, Some(8));
        assert_eq!(config.strategy, Some(Strategy::Cooperative));
        assert!(config.processes.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_empty_config() {
        let config: FileConfig = toml::from_str("").expect("Empty config should work");

        assert!(config.threads.is_none());
        assert!(config.processes.is_none());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_strategy_names() {
        let config: FileConfig = toml::from_str(r#"strategy = "multiprocess""#).unwrap();
        assert_eq!(config.strategy, Some(Strategy::Multiprocess));

        assert!(toml::from_str::<FileConfig>(r#"strategy = "fork""#).is_err());
    }

    #[test]
    fn test_width_follows_strategy() {
        let config = RunConfig {
            thread_width: 2,
            process_width: 6,
            ..RunConfig::default()
        };
        assert_eq!(config.width(), 2);

        let config = RunConfig {
            strategy: Strategy::Multiprocess,
            thread_width: 2,
            process_width: 6,
            ..RunConfig::default()
        };
        assert_eq!(config.width(), 6);
    }
}
