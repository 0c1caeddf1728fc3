//! Core types and traits for the Alpha Fleet Board.
//!
//! Wire and file formats stay JSON-compatible with the reference board's
//! `data.json` layout (`students`, `auditLog`, `lastUpdated`).

mod audit;
mod dto;
mod error;
mod student;
mod traits;

pub use audit::*;
pub use dto::*;
pub use error::*;
pub use student::*;
pub use traits::*;
