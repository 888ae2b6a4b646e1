//! In-memory log sink for testing and development

use super::{LogEntry, LogSink, Severity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Collects accepted entries in memory
///
/// Cloning shares the underlying buffer.
#[derive(Clone)]
pub struct InMemoryLogSink {
    min_level: Severity,
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl InMemoryLogSink {
    pub fn new(min_level: Severity) -> Self {
        Self {
            min_level,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of everything written so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Entries whose message contains `needle`
    pub fn find(&self, needle: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.message.contains(needle))
            .collect()
    }
}

impl Default for InMemoryLogSink {
    fn default() -> Self {
        Self::new(Severity::Information)
    }
}

#[async_trait]
impl LogSink for InMemoryLogSink {
    fn accepts(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entries.push(entry.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gate_defaults_to_information() {
        let sink = InMemoryLogSink::default();
        assert!(!sink.accepts(Severity::Debug));
        assert!(sink.accepts(Severity::Information));
        assert!(sink.accepts(Severity::Critical));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let sink = InMemoryLogSink::default();
        let other = sink.clone();

        other
            .write(&LogEntry::new(Severity::Warning, "test", "Order 4 not found"))
            .await
            .unwrap();

        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.find("not found").len(), 1);
        assert!(sink.find("created").is_empty());
    }
}
