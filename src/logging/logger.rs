//! Logger façade used by request handlers

use super::{LogEntry, LogSink, Severity};
use std::sync::Arc;

/// Named logger writing to a sink
///
/// Logging never fails from the caller's point of view. When the sink
/// rejects an entry the failure is reported through `tracing` and dropped.
#[derive(Clone)]
pub struct Logger {
    source: String,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(source: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            source: source.into(),
            sink,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Same sink, different source name
    pub fn named(&self, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sink: self.sink.clone(),
        }
    }

    pub async fn log(&self, level: Severity, message: impl Into<String>, error: Option<&anyhow::Error>) {
        if !self.sink.accepts(level) {
            return;
        }

        let mut entry = LogEntry::new(level, self.source.clone(), message);
        if let Some(error) = error {
            entry = entry.with_error(error);
        }

        if let Err(e) = self.sink.write(&entry).await {
            tracing::warn!(
                source = %self.source,
                level = %level,
                "Failed to write log entry: {:#}",
                e
            );
        }
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.log(Severity::Information, message, None).await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message, None).await;
    }

    pub async fn error(&self, message: impl Into<String>, error: &anyhow::Error) {
        self.log(Severity::Error, message, Some(error)).await;
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
