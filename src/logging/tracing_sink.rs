//! Sink forwarding entries to `tracing`

use super::{LogEntry, LogSink, Severity};
use anyhow::Result;
use async_trait::async_trait;

/// Re-emits entries as `tracing` events
///
/// Filtering is left to the installed subscriber (`RUST_LOG` / `EnvFilter`),
/// so this sink accepts every severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl LogSink for TracingSink {
    fn accepts(&self, _level: Severity) -> bool {
        true
    }

    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let source = entry.source.as_str();
        let message = entry.message.as_str();
        let exception = entry.exception.as_str();

        match entry.level {
            Severity::Trace => tracing::trace!(source, "{}", message),
            Severity::Debug => tracing::debug!(source, "{}", message),
            Severity::Information => tracing::info!(source, "{}", message),
            Severity::Warning => tracing::warn!(source, "{}", message),
            Severity::Error | Severity::Critical if exception.is_empty() => {
                tracing::error!(source, "{}", message)
            }
            Severity::Error | Severity::Critical => {
                tracing::error!(source, exception, "{}", message)
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_never_fails_without_subscriber() {
        let sink = TracingSink;
        for level in [Severity::Trace, Severity::Information, Severity::Critical] {
            assert!(sink.accepts(level));
            let entry = LogEntry::new(level, "test", "message")
                .with_error(&anyhow::anyhow!("cause"));
            assert!(sink.write(&entry).await.is_ok());
        }
    }
}
