//! Audit trail types: one immutable record per committed mutation.

use crate::Student;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of audited board action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "System Initialized")]
    SystemInitialized,
    #[serde(rename = "Moved to Pirate Ship")]
    MovedToPirateShip,
    #[serde(rename = "Released from Pirate Ship")]
    Released,
    #[serde(rename = "Auto-Release")]
    AutoRelease,
    #[serde(rename = "Extended")]
    Extended,
    #[serde(rename = "Custom End Date Set")]
    CustomEndSet,
    #[serde(rename = "Updated Notes")]
    NotesUpdated,
    #[serde(rename = "Student Added")]
    Added,
    #[serde(rename = "Student Deleted")]
    Removed,
    #[serde(rename = "Undo Action")]
    Undo,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AuditAction::SystemInitialized => "System Initialized",
            AuditAction::MovedToPirateShip => "Moved to Pirate Ship",
            AuditAction::Released => "Released from Pirate Ship",
            AuditAction::AutoRelease => "Auto-Release",
            AuditAction::Extended => "Extended",
            AuditAction::CustomEndSet => "Custom End Date Set",
            AuditAction::NotesUpdated => "Updated Notes",
            AuditAction::Added => "Student Added",
            AuditAction::Removed => "Student Deleted",
            AuditAction::Undo => "Undo Action",
        };
        f.write_str(label)
    }
}

/// One immutable audit log entry. `student_id = None` marks a system-wide
/// event. Snapshots are full values taken at commit time, never aliases of
/// the live roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub record_id: String,
    pub timestamp: DateTime<Utc>,
    pub student_id: Option<String>,
    pub action: AuditAction,
    pub actor: String,
    pub before: Option<Student>,
    pub after: Option<Student>,
}

impl AuditRecord {
    /// Build a record stamped with the current time and a fresh id.
    pub fn new(
        student_id: Option<String>,
        action: AuditAction,
        actor: &str,
        before: Option<Student>,
        after: Option<Student>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            student_id,
            action,
            actor: actor.to_string(),
            before,
            after,
        }
    }
}
