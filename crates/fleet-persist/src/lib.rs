//! Storage backend implementations behind `fleet_types::StorageBackend`.

mod json_file;
mod memory;

pub use fleet_types::{BoardDocument, StorageBackend, StorageError};
pub use json_file::JsonFileBackend;
pub use memory::InMemoryBackend;
