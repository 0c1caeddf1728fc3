//! In-memory backend (process lifetime only), used by tests and as the
//! stand-in for a key-value service.

use async_trait::async_trait;
use chrono::Utc;
use fleet_types::{AuditRecord, BoardDocument, StorageBackend, StorageError, Student};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct InMemoryBackend {
    doc: tokio::sync::RwLock<BoardDocument>,
    fail_saves: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail, to exercise the soft-warning path.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Current stored document.
    pub async fn snapshot(&self) -> BoardDocument {
        self.doc.read().await.clone()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn load(&self) -> BoardDocument {
        self.doc.read().await.clone()
    }

    async fn save(
        &self,
        students: &[Student],
        audit_log: &[AuditRecord],
    ) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Other("simulated save failure".to_string()));
        }
        let mut guard = self.doc.write().await;
        *guard = BoardDocument {
            students: students.to_vec(),
            audit_log: audit_log.to_vec(),
            last_updated: Some(Utc::now()),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_saves_do_not_touch_the_document() {
        let backend = InMemoryBackend::new();
        let student = Student::new("s1".into(), "Alex Smith".into(), None, "Admin");
        backend
            .save(std::slice::from_ref(&student), &[])
            .await
            .expect("save");

        backend.fail_saves(true);
        let err = backend.save(&[], &[]).await;
        assert!(err.is_err());
        assert_eq!(backend.snapshot().await.students.len(), 1);
    }
}
