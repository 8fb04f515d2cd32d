use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AuditEntry, AuditSink};
use crate::error::GurukulError;

pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        InMemoryAuditSink {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }
}

impl Default for InMemoryAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), GurukulError> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
