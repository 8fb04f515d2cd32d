use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{AuditEntry, AuditSink};
use crate::error::GurukulError;

/// Appends one line per entry to a plain text log file. Unlike the
/// snapshot stores this file is append-only and never rewritten.
pub struct FileAuditSink {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileAuditSink {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), GurukulError> {
        let line = format!(
            "{} {} {}\n",
            entry.recorded_at.to_rfc3339(),
            entry.action,
            entry.details
        );

        let _guard = self.guard.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| GurukulError::Audit(err.to_string()))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| GurukulError::Audit(err.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|err| GurukulError::Audit(err.to_string()))?;
        Ok(())
    }
}
