//! Storage adapters
//!
//! Both backends implement the [`Storage`](crate::core::Storage) port.
//! PostgreSQL is the production store; the in-memory store backs tests and
//! `--in-memory` runs and mirrors the schema's unique and foreign-key rules.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStorage;
pub use postgres::PostgresStorage;
