use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::GurukulError;

pub mod file;
pub mod in_memory;

pub use file::FileAuditSink;
pub use in_memory::InMemoryAuditSink;

#[derive(Clone, Debug, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(action: &str, details: serde_json::Value) -> Self {
        AuditEntry {
            id: Uuid::new_v4(),
            action: action.to_string(),
            details,
            recorded_at: Utc::now(),
        }
    }
}

/// Where committed mutations are journaled. The sink is a seam: the
/// service is generic over it so tests can capture entries in memory.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), GurukulError>;
}
