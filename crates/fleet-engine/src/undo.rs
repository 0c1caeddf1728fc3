//! Single-slot undo buffer with a TTL.

use chrono::{DateTime, Duration, Utc};
use fleet_types::AuditRecord;

/// Holds at most one reversible action. A new registration replaces any
/// pending one; the previous undo opportunity is simply gone.
#[derive(Debug, Default)]
pub(crate) struct UndoSlot {
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    record: AuditRecord,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub(crate) enum Taken {
    Empty,
    Expired,
    Ready(AuditRecord),
}

impl UndoSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: AuditRecord, ttl: Duration) {
        self.pending = Some(Pending {
            record,
            expires_at: Utc::now() + ttl,
        });
    }

    /// Take the pending action. The slot is cleared regardless of outcome.
    pub fn take(&mut self, now: DateTime<Utc>) -> Taken {
        match self.pending.take() {
            None => Taken::Empty,
            Some(p) if p.expires_at < now => Taken::Expired,
            Some(p) => Taken::Ready(p.record),
        }
    }
}
