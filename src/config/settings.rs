//! Configuration settings and validation.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::watcher::WatcherConfig;
use crate::{Error, Result};

/// How change reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One path per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Main configuration for the pollwatch binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to watch.
    pub root: PathBuf,

    /// Files stat'd per poll tick.
    pub chunk_size: usize,

    /// Delay between poll ticks.
    pub poll_interval: Duration,

    /// Length of one watch run; the tree is re-walked between runs.
    pub run_window: Duration,

    /// Treat every file existing at startup as already seen.
    pub skip_initial: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON.
    pub log_json: bool,

    /// Change report format.
    pub format: OutputFormat,

    /// Command to run on every change. Empty means print changes.
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let watcher = WatcherConfig::default();
        Self {
            root: PathBuf::from("."),
            chunk_size: watcher.chunk_size,
            poll_interval: watcher.poll_interval,
            run_window: Duration::from_secs(60),
            skip_initial: false,
            log_level: "warn".to_string(),
            log_json: false,
            format: OutputFormat::default(),
            command: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::config("root cannot be empty"));
        }

        if self.poll_interval.is_zero() {
            return Err(Error::config("poll interval cannot be 0"));
        }

        if self.run_window < self.poll_interval {
            return Err(Error::config(format!(
                "run window ({:?}) must be at least the poll interval ({:?})",
                self.run_window, self.poll_interval
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Watcher settings derived from this configuration.
    ///
    /// With `skip_initial` the watermark starts at the current time.
    #[must_use]
    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            chunk_size: self.chunk_size,
            poll_interval: self.poll_interval,
            initial_watermark: if self.skip_initial {
                Utc::now().timestamp_millis()
            } else {
                0
            },
        }
    }

    /// Number of poll ticks in one run window.
    #[must_use]
    pub fn cycles_per_run(&self) -> u128 {
        if self.poll_interval.is_zero() {
            return 0;
        }
        self.run_window.as_nanos() / self.poll_interval.as_nanos()
    }
}
