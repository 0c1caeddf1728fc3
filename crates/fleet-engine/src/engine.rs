//! The transition engine. Every mutating operation validates first, then
//! commits in one step: roster update, audit append, undo registration, and
//! a best-effort save. All operations (manual and sweep) serialize on one
//! mutex over the whole board state.

use crate::seed::seed_roster;
use crate::undo::{Taken, UndoSlot};
use chrono::{DateTime, Duration, Utc};
use fleet_store::{AuditLog, RosterStore, DEFAULT_AUDIT_CAP};
use fleet_types::{
    AuditAction, AuditRecord, BoardError, BulkOp, Status, StorageBackend, Student,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Actor recorded on sweeper-initiated releases.
pub const SYSTEM_AUTO_RELEASE: &str = "System-AutoRelease";

/// Default Pirate Ship stay when no end date is given.
pub const DEFAULT_BOARD_DAYS: i64 = 14;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long the last mutation stays undoable.
    pub undo_ttl: Duration,
    /// Audit log retention cap.
    pub audit_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            undo_ttl: Duration::seconds(10),
            audit_cap: DEFAULT_AUDIT_CAP,
        }
    }
}

/// Outcome of a successful mutating operation. `record` is `None` when the
/// operation was a no-op (already in the requested state) and nothing was
/// logged. A persistence warning means the in-memory commit stands but the
/// backend save failed.
#[derive(Debug)]
pub struct Commit {
    pub student: Option<Student>,
    pub record: Option<AuditRecord>,
    pub persist_warning: Option<String>,
}

impl Commit {
    pub fn changed(&self) -> bool {
        self.record.is_some()
    }
}

/// Result of an undo attempt.
#[derive(Debug)]
pub enum UndoOutcome {
    Undone(Commit),
    Empty,
    Expired,
}

struct BoardState {
    roster: RosterStore,
    audit: AuditLog,
    undo: UndoSlot,
}

pub struct BoardEngine {
    state: Mutex<BoardState>,
    backend: Arc<dyn StorageBackend>,
    undo_ttl: Duration,
}

impl BoardEngine {
    pub fn new(backend: Arc<dyn StorageBackend>, config: EngineConfig) -> Self {
        Self {
            state: Mutex::new(BoardState {
                roster: RosterStore::new(),
                audit: AuditLog::with_cap(config.audit_cap),
                undo: UndoSlot::new(),
            }),
            backend,
            undo_ttl: config.undo_ttl,
        }
    }

    /// Populate state from the backend. An empty document (first run or
    /// degraded load) installs the seed roster.
    pub async fn load(&self) {
        let doc = self.backend.load().await;
        let mut state = self.state.lock().await;
        if doc.students.is_empty() && doc.audit_log.is_empty() {
            let (students, record) = seed_roster(Utc::now());
            tracing::info!(students = students.len(), "no stored data; seeding roster");
            state.roster.replace_all(students);
            state.audit.replace_all(vec![record]);
            self.save_state(&state).await;
        } else {
            tracing::info!(
                students = doc.students.len(),
                audit_records = doc.audit_log.len(),
                "loaded board from backend"
            );
            state.roster.replace_all(doc.students);
            state.audit.replace_all(doc.audit_log);
        }
    }

    // Read paths.

    pub async fn list(&self) -> Vec<Student> {
        self.state.lock().await.roster.list()
    }

    pub async fn get(&self, id: &str) -> Option<Student> {
        self.state.lock().await.roster.get(id)
    }

    pub async fn audit(&self, student_id: Option<&str>, limit: Option<usize>) -> Vec<AuditRecord> {
        self.state.lock().await.audit.query(student_id, limit)
    }

    // Mutating operations.

    /// Move a student to Pirate Ship. Re-entry of an existing pirate
    /// overwrites the window.
    pub async fn board(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        notes: Option<&str>,
        actor: &str,
    ) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_board(&mut state, id, start, end, notes, actor)?;
        let persist_warning = self.save_state(&state).await;
        Ok(Commit {
            student: state.roster.get(id),
            record: Some(record),
            persist_warning,
        })
    }

    /// Release a student back to Active. Idempotent: an already-Active
    /// student succeeds without an audit record.
    pub async fn release(&self, id: &str, actor: &str) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_release(&mut state, id, actor, AuditAction::Released)?;
        let persist_warning = match record {
            Some(_) => self.save_state(&state).await,
            None => None,
        };
        Ok(Commit {
            student: state.roster.get(id),
            record,
            persist_warning,
        })
    }

    /// Push the end date out by `days` (must be positive).
    pub async fn extend(&self, id: &str, days: i64, actor: &str) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_extend(&mut state, id, days, actor)?;
        let persist_warning = self.save_state(&state).await;
        Ok(Commit {
            student: state.roster.get(id),
            record: Some(record),
            persist_warning,
        })
    }

    /// Replace the end date outright.
    pub async fn set_custom_end(
        &self,
        id: &str,
        new_end: DateTime<Utc>,
        actor: &str,
    ) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_custom_end(&mut state, id, new_end, actor)?;
        let persist_warning = self.save_state(&state).await;
        Ok(Commit {
            student: state.roster.get(id),
            record: Some(record),
            persist_warning,
        })
    }

    pub async fn update_notes(
        &self,
        id: &str,
        notes: &str,
        actor: &str,
    ) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_notes(&mut state, id, notes, actor)?;
        let persist_warning = self.save_state(&state).await;
        Ok(Commit {
            student: state.roster.get(id),
            record: Some(record),
            persist_warning,
        })
    }

    pub async fn add_student(
        &self,
        full_name: &str,
        house: Option<String>,
        actor: &str,
    ) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_add(&mut state, full_name, house, actor)?;
        let persist_warning = self.save_state(&state).await;
        Ok(Commit {
            student: record.after.clone(),
            record: Some(record),
            persist_warning,
        })
    }

    pub async fn remove_student(&self, id: &str, actor: &str) -> Result<Commit, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = self.apply_remove(&mut state, id, actor)?;
        let persist_warning = self.save_state(&state).await;
        Ok(Commit {
            student: None,
            record: Some(record),
            persist_warning,
        })
    }

    /// Apply one operation to each id in order. Per-id failures (unknown id,
    /// failed precondition) skip that id; the batch never aborts. Returns the
    /// number of students actually mutated.
    pub async fn bulk(
        &self,
        ids: &[String],
        op: &BulkOp,
        actor: &str,
    ) -> Result<usize, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let mut mutated = 0usize;
        for id in ids {
            let applied = match op {
                BulkOp::Board { start, end } => {
                    let start = start.unwrap_or_else(Utc::now);
                    let end = end.unwrap_or(start + Duration::days(DEFAULT_BOARD_DAYS));
                    self.apply_board(&mut state, id, start, end, None, actor)
                        .map(Some)
                }
                BulkOp::Release => {
                    self.apply_release(&mut state, id, actor, AuditAction::Released)
                }
                BulkOp::Extend { days } => {
                    self.apply_extend(&mut state, id, *days, actor).map(Some)
                }
            };
            match applied {
                Ok(Some(_)) => mutated += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(student_id = %id, error = %e, "bulk operation skipped id");
                }
            }
        }
        if mutated > 0 {
            self.save_state(&state).await;
        }
        Ok(mutated)
    }

    /// Release every pirate whose window has elapsed. Eligibility is
    /// recomputed from current state, so repeated sweeps are no-ops.
    pub async fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut state = self.state.lock().await;
        let due: Vec<String> = state
            .roster
            .iter()
            .filter(|s| s.status == Status::PirateShip && s.pirate_end.is_some_and(|end| end <= now))
            .map(|s| s.id.clone())
            .collect();
        let mut released = 0usize;
        for id in &due {
            match self.apply_release(&mut state, id, SYSTEM_AUTO_RELEASE, AuditAction::AutoRelease)
            {
                Ok(Some(_)) => released += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(student_id = %id, error = %e, "auto-release skipped id");
                }
            }
        }
        if released > 0 {
            self.save_state(&state).await;
        }
        released
    }

    /// Reverse the most recent mutation if it is still within its TTL.
    pub async fn undo(&self, actor: &str) -> Result<UndoOutcome, BoardError> {
        check_actor(actor)?;
        let mut state = self.state.lock().await;
        let record = match state.undo.take(Utc::now()) {
            Taken::Empty => return Ok(UndoOutcome::Empty),
            Taken::Expired => return Ok(UndoOutcome::Expired),
            Taken::Ready(record) => record,
        };

        let restored = match (&record.before, &record.after) {
            // Ordinary mutation or removal: put the before snapshot back.
            (Some(prev), _) => {
                state.roster.upsert(prev.clone());
                Some(prev.clone())
            }
            // Reversing an add: take the student out again.
            (None, Some(added)) => {
                state.roster.remove(&added.id);
                None
            }
            (None, None) => None,
        };

        if !state.audit.remove_exact(&record.record_id) {
            tracing::debug!(record_id = %record.record_id, "reversed record already trimmed");
        }
        let undo_record = AuditRecord::new(
            record.student_id.clone(),
            AuditAction::Undo,
            actor,
            record.after.clone(),
            restored.clone(),
        );
        state.audit.append(undo_record.clone());
        let persist_warning = self.save_state(&state).await;
        Ok(UndoOutcome::Undone(Commit {
            student: restored,
            record: Some(undo_record),
            persist_warning,
        }))
    }

    // Locked helpers. Each validates, mutates the roster, appends the audit
    // record, and registers the undo slot. Validation failures leave the
    // state untouched.

    fn apply_board(
        &self,
        state: &mut BoardState,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        notes: Option<&str>,
        actor: &str,
    ) -> Result<AuditRecord, BoardError> {
        if end < start {
            return Err(BoardError::InvalidWindow { start, end });
        }
        let before = state
            .roster
            .get(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let mut after = before.clone();
        after.status = Status::PirateShip;
        after.pirate_start = Some(start);
        after.pirate_end = Some(end);
        if let Some(n) = notes {
            if !n.trim().is_empty() {
                after.notes = n.to_string();
            }
        }
        after.touch(actor, Utc::now());
        Ok(self.commit(state, before, after, AuditAction::MovedToPirateShip, actor))
    }

    fn apply_release(
        &self,
        state: &mut BoardState,
        id: &str,
        actor: &str,
        action: AuditAction,
    ) -> Result<Option<AuditRecord>, BoardError> {
        let before = state
            .roster
            .get(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        if before.status == Status::Active {
            // Already in the target state; succeed without audit noise.
            return Ok(None);
        }
        let mut after = before.clone();
        after.status = Status::Active;
        after.pirate_start = None;
        after.pirate_end = None;
        after.touch(actor, Utc::now());
        Ok(Some(self.commit(state, before, after, action, actor)))
    }

    fn apply_extend(
        &self,
        state: &mut BoardState,
        id: &str,
        days: i64,
        actor: &str,
    ) -> Result<AuditRecord, BoardError> {
        if days < 1 {
            return Err(BoardError::NotEligible(
                "extension must be at least one day".to_string(),
            ));
        }
        let before = state
            .roster
            .get(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let end = match (before.status, before.pirate_end) {
            (Status::PirateShip, Some(end)) => end,
            _ => {
                return Err(BoardError::NotEligible(format!(
                    "{} is not in Pirate Ship",
                    before.full_name
                )))
            }
        };
        // Checked arithmetic: an absurd delta is a validation error, not a panic.
        let new_end = Duration::try_days(days)
            .and_then(|delta| end.checked_add_signed(delta))
            .ok_or_else(|| {
                BoardError::NotEligible(format!("extension of {} days is out of range", days))
            })?;
        let mut after = before.clone();
        after.pirate_end = Some(new_end);
        after.touch(actor, Utc::now());
        Ok(self.commit(state, before, after, AuditAction::Extended, actor))
    }

    fn apply_custom_end(
        &self,
        state: &mut BoardState,
        id: &str,
        new_end: DateTime<Utc>,
        actor: &str,
    ) -> Result<AuditRecord, BoardError> {
        let before = state
            .roster
            .get(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let start = match (before.status, before.pirate_start) {
            (Status::PirateShip, Some(start)) => start,
            _ => {
                return Err(BoardError::NotEligible(format!(
                    "{} is not in Pirate Ship",
                    before.full_name
                )))
            }
        };
        if new_end < start {
            return Err(BoardError::InvalidWindow {
                start,
                end: new_end,
            });
        }
        let mut after = before.clone();
        after.pirate_end = Some(new_end);
        after.touch(actor, Utc::now());
        Ok(self.commit(state, before, after, AuditAction::CustomEndSet, actor))
    }

    fn apply_notes(
        &self,
        state: &mut BoardState,
        id: &str,
        notes: &str,
        actor: &str,
    ) -> Result<AuditRecord, BoardError> {
        let before = state
            .roster
            .get(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let mut after = before.clone();
        after.notes = notes.to_string();
        after.touch(actor, Utc::now());
        Ok(self.commit(state, before, after, AuditAction::NotesUpdated, actor))
    }

    fn apply_add(
        &self,
        state: &mut BoardState,
        full_name: &str,
        house: Option<String>,
        actor: &str,
    ) -> Result<AuditRecord, BoardError> {
        let name = full_name.trim();
        if name.is_empty() {
            return Err(BoardError::InvalidName);
        }
        let student = Student::new(
            format!("student-{}", Uuid::new_v4()),
            name.to_string(),
            house,
            actor,
        );
        state.roster.upsert(student.clone());
        let record = AuditRecord::new(
            Some(student.id.clone()),
            AuditAction::Added,
            actor,
            None,
            Some(student),
        );
        state.audit.append(record.clone());
        state.undo.register(record.clone(), self.undo_ttl);
        Ok(record)
    }

    fn apply_remove(
        &self,
        state: &mut BoardState,
        id: &str,
        actor: &str,
    ) -> Result<AuditRecord, BoardError> {
        let removed = state
            .roster
            .remove(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let record = AuditRecord::new(
            Some(id.to_string()),
            AuditAction::Removed,
            actor,
            Some(removed),
            None,
        );
        state.audit.append(record.clone());
        state.undo.register(record.clone(), self.undo_ttl);
        Ok(record)
    }

    fn commit(
        &self,
        state: &mut BoardState,
        before: Student,
        after: Student,
        action: AuditAction,
        actor: &str,
    ) -> AuditRecord {
        debug_assert!(after.window_consistent());
        state.roster.upsert(after.clone());
        let record = AuditRecord::new(
            Some(after.id.clone()),
            action,
            actor,
            Some(before),
            Some(after),
        );
        state.audit.append(record.clone());
        state.undo.register(record.clone(), self.undo_ttl);
        record
    }

    /// Best-effort save. Failure never rolls back the commit; it is logged
    /// and surfaced as a warning.
    async fn save_state(&self, state: &BoardState) -> Option<String> {
        match self
            .backend
            .save(state.roster.as_slice(), state.audit.as_slice())
            .await
        {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "save failed; in-memory state retained");
                Some(e.to_string())
            }
        }
    }
}

fn check_actor(actor: &str) -> Result<(), BoardError> {
    if actor.trim().is_empty() {
        return Err(BoardError::EmptyActor);
    }
    Ok(())
}
