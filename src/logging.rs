//! Tracing setup for hosts embedding the gateway.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the host. [`init_logging`] is a convenience for hosts and tests
//! that have no subscriber of their own.
//!
//! ```rust,ignore
//! use btc_gateway::logging::{init_logging, LogLevel};
//!
//! init_logging(LogLevel::Info)?; // RUST_LOG overrides the level
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::protocol::events::BridgeEvent;

/// Tracing target used for forwarded events
pub const EVENT_TARGET: &str = "btc_gateway::events";

/// Default verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Commits and internal steps
    Debug,
    /// Successful operations
    Info,
    /// Rejected calls and anomalies
    Warn,
    /// Errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Fails with `Error::Config` if a
/// global subscriber is already set.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::from(level).to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install subscriber: {}", e)))
}

/// Emit a gateway event as a JSON line under [`EVENT_TARGET`]
pub fn log_event(event: &BridgeEvent) -> Result<()> {
    let json = event.to_json()?;
    tracing::info!(target: EVENT_TARGET, kind = event.event_type(), "{}", json);
    Ok(())
}
