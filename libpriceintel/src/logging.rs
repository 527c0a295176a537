//! Logging setup shared by library consumers and the `priceintel` binary
//!
//! Output goes to stderr so that resolved strings and JSON reports on stdout
//! stay pipeable. `RUST_LOG` always wins over the configured level.
//!
//! # Examples
//!
//! ```no_run
//! use libpriceintel::logging::{LoggingConfig, LogFormat};
//!
//! LoggingConfig::new(LogFormat::Json, "debug".to_string(), false).init();
//!
//! // Or read PRICEINTEL_LOG_FORMAT / PRICEINTEL_LOG_LEVEL
//! libpriceintel::logging::init_default();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "PRICEINTEL_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "PRICEINTEL_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text, no colors
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line, colored
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    /// Forces `debug` unless `RUST_LOG` is set
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Build a configuration from `PRICEINTEL_LOG_FORMAT` and `PRICEINTEL_LOG_LEVEL`
    ///
    /// Unparseable formats fall back to text; a missing level means `warn`,
    /// which keeps missing-translation noise out of normal runs.
    pub fn from_env() -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogFormat::Text);
        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "warn".to_string());
        Self::new(format, level, false)
    }

    /// The directive used when `RUST_LOG` is absent
    pub fn effective_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.effective_level()))
    }

    /// Install the global subscriber, failing if one is already installed
    pub fn try_init(&self) -> Result<(), String> {
        let filter = self.filter();
        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(false)
                .try_init(),
        };
        result.map_err(|e| e.to_string())
    }

    /// Install the global subscriber
    ///
    /// A second call is ignored; the first subscriber stays in place.
    pub fn init(&self) {
        if let Err(e) = self.try_init() {
            eprintln!("Logging already initialized: {}", e);
        }
    }
}

/// Initialize logging from the `PRICEINTEL_LOG_*` environment variables
///
/// ```bash
/// export PRICEINTEL_LOG_FORMAT=json
/// export PRICEINTEL_LOG_LEVEL=debug
/// priceintel locale
/// ```
pub fn init_default() {
    LoggingConfig::from_env().init();
}
