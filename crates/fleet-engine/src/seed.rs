//! Deterministic demo roster, a port of the reference board's seed data:
//! 18 students, the first five already in Pirate Ship on a 14-day window.

use chrono::{DateTime, Duration, Utc};
use fleet_types::{AuditAction, AuditRecord, Status, Student};

const FIRST_NAMES: [&str; 20] = [
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Sam", "Drew", "Avery", "Charlie",
    "Dakota", "Emerson", "Finley", "Harper", "Jamie", "Kai", "Logan", "Skyler", "Quinn", "Reese",
];

const LAST_NAMES: [&str; 20] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Hernandez",
    "Lopez",
    "Gonzalez",
    "Wilson",
    "Anderson",
    "Thomas",
    "Taylor",
    "Moore",
    "Jackson",
    "Martin",
];

const HOUSES: [&str; 4] = ["Alpha", "Bravo", "Charlie", "Delta"];

const SEED_COUNT: usize = 18;
const ALREADY_BOARDED: usize = 5;

/// Seed roster plus the system-wide "System Initialized" audit record.
/// Boarded students start a few days in the past so their countdowns differ.
pub fn seed_roster(now: DateTime<Utc>) -> (Vec<Student>, AuditRecord) {
    let mut students = Vec::with_capacity(SEED_COUNT);
    for i in 0..SEED_COUNT {
        let full_name = format!(
            "{} {}",
            FIRST_NAMES[i % FIRST_NAMES.len()],
            LAST_NAMES[(i * 7 + 3) % LAST_NAMES.len()]
        );
        let mut student = Student::new(
            format!("student-seed-{:02}", i),
            full_name,
            Some(HOUSES[i % HOUSES.len()].to_string()),
            "System",
        );
        student.last_updated_at = now;
        if i < ALREADY_BOARDED {
            let start = now - Duration::days(i as i64 + 3);
            student.status = Status::PirateShip;
            student.pirate_start = Some(start);
            student.pirate_end = Some(start + Duration::days(14));
        }
        students.push(student);
    }
    let record = AuditRecord::new(None, AuditAction::SystemInitialized, "System", None, None);
    (students, record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic_and_consistent() {
        let now = Utc::now();
        let (a, _) = seed_roster(now);
        let (b, _) = seed_roster(now);
        assert_eq!(a, b);
        assert_eq!(a.len(), SEED_COUNT);
        assert!(a.iter().all(Student::window_consistent));

        let boarded = a
            .iter()
            .filter(|s| s.status == Status::PirateShip)
            .count();
        assert_eq!(boarded, ALREADY_BOARDED);
        // None of the seeded windows is already overdue.
        for s in a.iter().filter(|s| s.status == Status::PirateShip) {
            assert!(s.days_remaining(now).unwrap_or(0) > 0);
        }
    }

    #[test]
    fn seed_record_is_system_wide() {
        let (_, record) = seed_roster(Utc::now());
        assert!(record.student_id.is_none());
        assert_eq!(record.action, AuditAction::SystemInitialized);
        assert_eq!(record.actor, "System");
    }
}
