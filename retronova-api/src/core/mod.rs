//! Core abstractions and types
//!
//! Error definitions and the storage port shared by services, handlers
//! and adapters.

pub mod error;
pub mod traits;

// Re-export commonly used items
pub use error::{ApiError, ApiResult, StorageError, StorageResult};
pub use traits::Storage;
