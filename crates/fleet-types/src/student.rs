//! Student roster entry and its status/window invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a student currently sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Normal roster state, no temporary window.
    Active,
    /// Temporary status with a start/end window.
    PirateShip,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => f.write_str("Active"),
            Status::PirateShip => f.write_str("PirateShip"),
        }
    }
}

/// One tracked roster member.
///
/// Invariant: `status == PirateShip` iff both window fields are set with
/// `pirate_start <= pirate_end`. Transitions must set or clear both fields
/// together with the status; [`Student::window_consistent`] checks this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub full_name: String,
    /// Free-form group label (house/squad); optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    pub status: Status,
    pub pirate_start: Option<DateTime<Utc>>,
    pub pirate_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub last_updated_by: String,
    pub last_updated_at: DateTime<Utc>,
}

impl Student {
    /// Create a new Active student with empty windows.
    pub fn new(id: String, full_name: String, house: Option<String>, actor: &str) -> Self {
        Self {
            id,
            full_name,
            house,
            status: Status::Active,
            pirate_start: None,
            pirate_end: None,
            notes: String::new(),
            last_updated_by: actor.to_string(),
            last_updated_at: Utc::now(),
        }
    }

    /// True when status and window fields agree.
    pub fn window_consistent(&self) -> bool {
        match self.status {
            Status::Active => self.pirate_start.is_none() && self.pirate_end.is_none(),
            Status::PirateShip => match (self.pirate_start, self.pirate_end) {
                (Some(start), Some(end)) => start <= end,
                _ => false,
            },
        }
    }

    /// Whole days until `pirate_end`, rounded up. Negative when overdue,
    /// `None` when no end date is set.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        let end = self.pirate_end?;
        let secs = (end - now).num_seconds();
        Some(secs.div_euclid(86_400) + i64::from(secs.rem_euclid(86_400) > 0))
    }

    /// Stamp provenance of a mutation.
    pub fn touch(&mut self, actor: &str, now: DateTime<Utc>) {
        self.last_updated_by = actor.to_string();
        self.last_updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn student() -> Student {
        Student::new("s1".into(), "Alex Smith".into(), None, "Test")
    }

    #[test]
    fn new_student_is_consistent() {
        assert!(student().window_consistent());
    }

    #[test]
    fn pirate_without_window_is_inconsistent() {
        let mut s = student();
        s.status = Status::PirateShip;
        assert!(!s.window_consistent());
        s.pirate_start = Some(Utc::now());
        assert!(!s.window_consistent());
    }

    #[test]
    fn days_remaining_rounds_up() {
        let now = Utc::now();
        let mut s = student();
        s.status = Status::PirateShip;
        s.pirate_start = Some(now);

        s.pirate_end = Some(now + Duration::hours(1));
        assert_eq!(s.days_remaining(now), Some(1));

        s.pirate_end = Some(now + Duration::days(14));
        assert_eq!(s.days_remaining(now), Some(14));

        s.pirate_end = Some(now - Duration::hours(30));
        assert_eq!(s.days_remaining(now), Some(-1));
    }

    #[test]
    fn status_serializes_to_reference_labels() {
        assert_eq!(
            serde_json::to_string(&Status::PirateShip).ok().as_deref(),
            Some("\"PirateShip\"")
        );
        assert_eq!(
            serde_json::to_string(&Status::Active).ok().as_deref(),
            Some("\"Active\"")
        );
    }
}
