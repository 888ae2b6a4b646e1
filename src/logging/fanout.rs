//! Fan-out sink writing each entry to several sinks

use super::{LogEntry, LogSink, Severity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;

/// Forwards entries to every inner sink that accepts them
///
/// All accepting sinks are attempted even when an earlier one fails; the
/// failures are then reported together.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: Arc<dyn LogSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl LogSink for FanoutSink {
    fn accepts(&self, level: Severity) -> bool {
        self.sinks.iter().any(|sink| sink.accepts(level))
    }

    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut failures = Vec::new();

        for sink in self.sinks.iter().filter(|sink| sink.accepts(entry.level)) {
            if let Err(e) = sink.write(entry).await {
                failures.push(format!("{:#}", e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "{} log sink(s) failed: {}",
                failures.len(),
                failures.join("; ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::InMemoryLogSink;

    struct FailingSink;

    #[async_trait]
    impl LogSink for FailingSink {
        fn accepts(&self, _level: Severity) -> bool {
            true
        }

        async fn write(&self, _entry: &LogEntry) -> Result<()> {
            Err(anyhow!("disk full"))
        }
    }

    #[tokio::test]
    async fn test_routes_by_each_sink_gate() {
        let everything = Arc::new(InMemoryLogSink::new(Severity::Trace));
        let important = Arc::new(InMemoryLogSink::new(Severity::Warning));
        let fanout = FanoutSink::new()
            .with_sink(everything.clone())
            .with_sink(important.clone());

        fanout
            .write(&LogEntry::new(Severity::Debug, "test", "noise"))
            .await
            .unwrap();
        fanout
            .write(&LogEntry::new(Severity::Error, "test", "boom"))
            .await
            .unwrap();

        assert_eq!(everything.entries().len(), 2);
        assert_eq!(important.entries().len(), 1);
        assert_eq!(important.entries()[0].message, "boom");
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_sinks() {
        let memory = Arc::new(InMemoryLogSink::new(Severity::Trace));
        let fanout = FanoutSink::new()
            .with_sink(Arc::new(FailingSink))
            .with_sink(memory.clone());

        let result = fanout
            .write(&LogEntry::new(Severity::Information, "test", "hello"))
            .await;

        assert!(result.unwrap_err().to_string().contains("disk full"));
        assert_eq!(memory.entries().len(), 1);
    }

    #[test]
    fn test_accepts_if_any_sink_accepts() {
        let fanout = FanoutSink::new()
            .with_sink(Arc::new(InMemoryLogSink::new(Severity::Error)));
        assert!(!fanout.accepts(Severity::Information));
        assert!(fanout.accepts(Severity::Critical));
        assert!(!FanoutSink::new().accepts(Severity::Critical));
    }
}
