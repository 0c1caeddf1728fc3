//! Insertion-ordered roster of students.

use fleet_types::Student;

/// In-memory entity store. Iteration follows insertion order; any
/// presentation ordering is the caller's responsibility.
#[derive(Debug, Default)]
pub struct RosterStore {
    students: Vec<Student>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Snapshot of one student by id.
    pub fn get(&self, id: &str) -> Option<Student> {
        self.students.iter().find(|s| s.id == id).cloned()
    }

    /// Snapshot of all students in insertion order.
    pub fn list(&self) -> Vec<Student> {
        self.students.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn as_slice(&self) -> &[Student] {
        &self.students
    }

    /// Replace the whole roster (bulk load).
    pub fn replace_all(&mut self, students: Vec<Student>) {
        self.students = students;
    }

    /// Insert a new student or replace the one with the same id in place.
    pub fn upsert(&mut self, student: Student) {
        match self.students.iter_mut().find(|s| s.id == student.id) {
            Some(slot) => *slot = student,
            None => self.students.push(student),
        }
    }

    /// Remove by id, returning the removed student.
    pub fn remove(&mut self, id: &str) -> Option<Student> {
        let pos = self.students.iter().position(|s| s.id == id)?;
        Some(self.students.remove(pos))
    }
}
