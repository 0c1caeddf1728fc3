//! HTTP surface of the board: router, admin gate, and CSV export.

pub mod auth;
pub mod export;
pub mod server;
