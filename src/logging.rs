//! Logging for the payment client.
//!
//! The client never logs through a global. It reports to an injected
//! [`LogSink`]; [`NullSink`] drops everything and is what a client gets when no
//! sink is configured. [`TracingSink`] forwards to `tracing`, which the
//! embedding application wires up with [`init_tracing`].

use crate::config::{LogFormat, LoggingConfig};
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_TARGET: &str = "saferpay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Critical => "critical",
        }
    }
}

/// Structured values attached to a log entry.
pub type LogContext = Vec<(&'static str, String)>;

pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, context: &LogContext);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, &LogContext::new());
    }

    fn critical(&self, message: &str, context: LogContext) {
        self.log(LogLevel::Critical, message, &context);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: &str, _context: &LogContext) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str, context: &LogContext) {
        let context = format_context(context);
        match level {
            LogLevel::Debug => tracing::debug!(target: LOG_TARGET, context = %context, "{}", message),
            // tracing has no level above error
            LogLevel::Critical => {
                tracing::error!(target: LOG_TARGET, severity = "critical", context = %context, "{}", message)
            }
        }
    }
}

fn format_context(context: &LogContext) -> String {
    context
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Installs a global `tracing` subscriber for binaries embedding the client.
///
/// `RUST_LOG` wins over `config.level` when set.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Plain => subscriber
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .try_init(),
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    if let Err(e) = result {
        tracing::warn!("tracing subscriber already installed: {}", e);
    }
}
