//! Request and response DTOs for the board API.

use crate::{AuditRecord, Status, Student};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base response envelope. HTTP status stays 200; `code` carries the
/// application-level result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(default = "default_code")]
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn default_code() -> i32 {
    200
}

impl<T> BaseResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// A student as presented to the UI: the entry plus its countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_left: Option<i64>,
}

impl StudentView {
    pub fn at(student: Student, now: DateTime<Utc>) -> Self {
        let days_left = match student.status {
            Status::PirateShip => student.days_remaining(now),
            Status::Active => None,
        };
        Self { student, days_left }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStudentRequest {
    pub full_name: String,
    #[serde(default)]
    pub house: Option<String>,
    pub actor: String,
}

/// Move a student to Pirate Ship. Omitted `start` defaults to now and
/// omitted `end` to start + 14 days, matching the reference modal defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRequest {
    pub student_id: String,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub student_id: String,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendRequest {
    pub student_id: String,
    pub days: i64,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomEndRequest {
    pub student_id: String,
    pub new_end: DateTime<Utc>,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesRequest {
    pub student_id: String,
    pub notes: String,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    pub student_id: String,
    pub actor: String,
}

/// One of the three bulk-applicable operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BulkOp {
    Board {
        #[serde(default)]
        start: Option<DateTime<Utc>>,
        #[serde(default)]
        end: Option<DateTime<Utc>>,
    },
    Release,
    Extend {
        days: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    pub student_ids: Vec<String>,
    pub op: BulkOp,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResult {
    /// Number of students actually mutated; skipped ids are not an error.
    pub mutated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoRequest {
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditListData {
    pub records: Vec<AuditRecord>,
}
