//! Logging setup for Mailflow with email address redaction
//!
//! [`init`] installs the global `tracing` subscriber: a pretty format for
//! development or JSON lines for production, filtered by `RUST_LOG` or the
//! configured level. [`PiiRedactor`] masks email and IP addresses in text
//! before it is logged.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{LoggerConfig, PiiRedactor};
//!
//! logger_redacted::init(&LoggerConfig::default()).ok();
//!
//! let redactor = PiiRedactor::default();
//! tracing::info!(to = %redactor.redact("ops@example.com"), "Sending email");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber.
///
/// # Errors
///
/// [`LoggerError::InvalidFilter`] for an unparsable level directive and
/// [`LoggerError::AlreadyInitialized`] if a subscriber is already set.
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| LoggerError::InvalidFilter {
            directive: config.level.clone(),
            reason: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
