//! Structured logging.

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format string, falling back to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Builds logging configuration from settings.
    ///
    /// `SCAMGUARD_LOG`, then `RUST_LOG`, take precedence over the configured
    /// filter. `verbose` raises the crate's own level to debug.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let directive = std::env::var("SCAMGUARD_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .or_else(|| settings.filter.clone())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        Self {
            format: settings.format,
            filter: build_filter(&directive, verbose),
        }
    }
}

/// Builds an `EnvFilter`, falling back to the default on a bad directive.
fn build_filter(directive: &str, verbose: bool) -> EnvFilter {
    let directive = if verbose {
        format!("{directive},scamguard=debug")
    } else {
        directive.to_string()
    };

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
