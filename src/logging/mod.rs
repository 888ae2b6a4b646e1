//! Business event logging with pluggable sinks
//!
//! Handlers log through a [`Logger`], which formats a [`LogEntry`] and hands
//! it to a [`LogSink`]. Sinks declare which severities they accept and write
//! entries somewhere: the `tracing` console ([`TracingSink`]), a database
//! table (`storage::postgres::PostgresLogSink`), or memory for tests
//! ([`InMemoryLogSink`]). Several sinks are combined with a [`FanoutSink`].
//!
//! # Architecture
//!
//! ```text
//! handler ──▶ Logger ──▶ FanoutSink ──┬──▶ TracingSink   (stdout via tracing-subscriber)
//!                                     └──▶ PostgresLogSink (log_entries table, >= Information)
//! ```
//!
//! A sink failure never reaches the handler: the [`Logger`] reports it
//! through `tracing` and carries on.

pub mod fanout;
pub mod logger;
pub mod memory;
pub mod tracing_sink;

pub use fanout::FanoutSink;
pub use logger::Logger;
pub use memory::InMemoryLogSink;
pub use tracing_sink::TracingSink;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "information" | "info" => Ok(Severity::Information),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// One log event, as written to a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: Severity,
    pub message: String,
    /// Originating component, e.g. `delivery::orders`
    pub source: String,
    /// Error text, empty when the event carries no error
    pub exception: String,
    pub logged_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(level: Severity, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            source: source.into(),
            exception: String::new(),
            logged_at: Utc::now(),
        }
    }

    /// Attach an error, rendered with its full cause chain
    pub fn with_error(mut self, error: &anyhow::Error) -> Self {
        self.exception = format!("{:#}", error);
        self
    }
}

/// Destination for log entries
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Whether entries at `level` should be written at all
    fn accepts(&self, level: Severity) -> bool;

    /// Write one entry; callers check [`accepts`](Self::accepts) first
    async fn write(&self, entry: &LogEntry) -> Result<()>;
}
