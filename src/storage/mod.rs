//! Storage layer for the persisted access token.
//!
//! # Modules
//!
//! - `backend`: Key-value trait
//! - `json`: JSON file implementation with atomic writes
//! - `memory`: Shared in-memory implementation

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use json::JsonKeyValueStore;
pub use memory::MemoryKeyValueStore;
