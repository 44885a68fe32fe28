//! Domain layer - entities, request payloads and their invariants
//!
//! Nothing here talks to the database or HTTP; services and storage
//! adapters build on these types.

pub mod models;

// Re-export commonly used items
pub use models::*;
