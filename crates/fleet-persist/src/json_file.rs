//! Flat JSON file backend (the reference board's `data.json`).

use async_trait::async_trait;
use chrono::Utc;
use fleet_types::{AuditRecord, BoardDocument, StorageBackend, StorageError, Student};
use std::path::{Path, PathBuf};

/// Persists the whole board document to one pretty-printed JSON file.
pub struct JsonFileBackend {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn load(&self) -> BoardDocument {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BoardDocument::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "board file unreadable; starting empty");
                return BoardDocument::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "board file malformed; starting empty");
                BoardDocument::default()
            }
        }
    }

    async fn save(
        &self,
        students: &[Student],
        audit_log: &[AuditRecord],
    ) -> Result<(), StorageError> {
        let doc = BoardDocument {
            students: students.to_vec(),
            audit_log: audit_log.to_vec(),
            last_updated: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| StorageError::Other(e.to_string()))?;
        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StorageError::Other(e.to_string()))
    }
}
