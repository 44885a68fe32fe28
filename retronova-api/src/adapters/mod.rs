//! Adapters layer - Infrastructure implementations
//!
//! Concrete implementations of the port traits defined in the core layer.

pub mod storage;

// Re-export commonly used adapters
pub use storage::{InMemoryStorage, PostgresStorage};
