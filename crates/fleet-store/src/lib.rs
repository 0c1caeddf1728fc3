//! Roster store and audit log. Plain synchronous structures; the engine
//! serializes all access behind a single mutex.

mod audit;
mod roster;

pub use audit::{AuditLog, DEFAULT_AUDIT_CAP};
pub use roster::RosterStore;
