//! Storage layer for Questline
//!
//! Async store traits with two backends: MySQL via sqlx (production) and an
//! in-process memory backend with the same semantics (tests, `serve --memory`).

mod backend;
pub mod error;
mod memory;
mod migrations;
mod mysql;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use migrations::ensure_core_tables;
pub use mysql::MySqlStorage;
