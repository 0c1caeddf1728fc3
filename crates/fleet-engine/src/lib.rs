//! Board engine: validated state transitions over the roster, each paired
//! with an audit record, a single-shot undo opportunity, and a best-effort
//! save to the storage backend.

mod engine;
mod seed;
mod undo;

pub use engine::{
    BoardEngine, Commit, EngineConfig, UndoOutcome, DEFAULT_BOARD_DAYS, SYSTEM_AUTO_RELEASE,
};
pub use seed::seed_roster;
