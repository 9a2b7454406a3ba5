//! Logging subscriber initialisation.

use std::io;

use clap::{Args, ValueEnum};
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Compact,

    /// One JSON object per event
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Args)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    #[arg(long, global = true, env = "SHOPFRONT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log line format
    #[arg(long, global = true, env = "SHOPFRONT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Install the global tracing subscriber, writing to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_subscriber(config: &LoggingArgs) -> Result<(), TryInitError> {
    match config.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(io::stderr),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_writer(io::stderr),
        ),
    }
}

fn build_env_filter(config: &LoggingArgs) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

fn init_with_layer<L>(config: &LoggingArgs, fmt_layer: L) -> Result<(), TryInitError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_rejected() {
        let config = LoggingArgs {
            log_level: "error".to_string(),
            log_format: LogFormat::Json,
        };

        let first = init_subscriber(&config);
        let second = init_subscriber(&config);

        assert!(first.is_ok(), "{first:?}");
        assert!(second.is_err());
    }

    #[test]
    fn log_format_parses_from_flag_values() {
        assert_eq!(LogFormat::from_str("json", true), Ok(LogFormat::Json));
        assert_eq!(LogFormat::from_str("compact", true), Ok(LogFormat::Compact));
        assert!(LogFormat::from_str("yaml", true).is_err());
    }
}
