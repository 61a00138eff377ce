//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database repositories, the in-memory fallback
//! store, and the local image store.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;
pub mod memory;
pub mod storage;

// Re-exports - In-Memory
pub use memory::{MemoryCategoryRepository, MemoryPostRepository, MemorySeeder, MemoryStore};
pub use storage::LocalImageStore;

pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::{PostgresCategoryRepository, PostgresPostRepository, PostgresSeeder, connect};
