//! Persistence backend contract.

use crate::{AuditRecord, Student};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage error: {0}")]
    Other(String),
}

/// Durable document shape, mirroring the reference board's `data.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default, rename = "auditLog")]
    pub audit_log: Vec<AuditRecord>,
    #[serde(default, rename = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Storage backend for the roster and audit log.
///
/// Contract: `load` degrades gracefully, returning an empty document on any
/// backend error. `save` failures are reported to the caller but never roll
/// back the in-memory state that already committed.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Load the whole board document; empty on error or first run.
    async fn load(&self) -> BoardDocument;

    /// Persist the whole board document, best effort.
    async fn save(
        &self,
        students: &[Student],
        audit_log: &[AuditRecord],
    ) -> Result<(), StorageError>;
}
