//! Append-only audit log with a retention cap.

use fleet_types::AuditRecord;

/// Default retention cap.
pub const DEFAULT_AUDIT_CAP: usize = 1000;

/// Ordered audit log. Append-only under normal operation; records leave the
/// log only through the retention trim (oldest first) or `remove_exact`
/// during an undo.
#[derive(Debug)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
    cap: usize,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog {
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_AUDIT_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            records: Vec::new(),
            cap: cap.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Append unconditionally, then trim the oldest records beyond the cap.
    pub fn append(&mut self, record: AuditRecord) {
        self.records.push(record);
        if self.records.len() > self.cap {
            let excess = self.records.len() - self.cap;
            self.records.drain(..excess);
        }
    }

    /// Records for one student (or all when `student_id` is `None`),
    /// newest first, up to `limit`.
    pub fn query(&self, student_id: Option<&str>, limit: Option<usize>) -> Vec<AuditRecord> {
        let take = limit.unwrap_or(usize::MAX);
        self.records
            .iter()
            .rev()
            .filter(|r| match student_id {
                Some(id) => r.student_id.as_deref() == Some(id),
                None => true,
            })
            .take(take)
            .cloned()
            .collect()
    }

    /// Remove the identified record. Returns false when it is no longer
    /// present (already trimmed or already removed). Used only by undo.
    pub fn remove_exact(&mut self, record_id: &str) -> bool {
        match self.records.iter().position(|r| r.record_id == record_id) {
            Some(pos) => {
                self.records.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replace the whole log (bulk load). Enforces the cap.
    pub fn replace_all(&mut self, mut records: Vec<AuditRecord>) {
        if records.len() > self.cap {
            let excess = records.len() - self.cap;
            records.drain(..excess);
        }
        self.records = records;
    }
}
