//! Retronova arcade backend
//!
//! REST service for an arcade venue: player accounts and ticket balances,
//! friend requests, games and the machines hosting them, two-player parties,
//! ticket payments and promo codes. PostgreSQL is the system of record; an
//! in-memory store implements the same storage port for tests.

pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod services;

// Re-export commonly used types
pub use adapters::{InMemoryStorage, PostgresStorage};
pub use api::{create_app, start_server, ApiState};
pub use config::AppConfig;
pub use self::core::{ApiError, ApiResult, Storage, StorageError, StorageResult};
