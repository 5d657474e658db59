//! doi-store: Journal repository for the journal resolution service
//!
//! This crate provides:
//! - The `JournalRepository` contract consumed by the resolver
//! - An in-memory repository for development and tests
//! - PostgreSQL storage via sqlx, with embedded migrations
//!
//! # Usage
//!
//! ```rust,ignore
//! use doi_store::{JournalAttribute, JournalRepository, PgJournalStore, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = PgJournalStore::connect(config).await?;
//!
//! let ids = store.find_by_attribute(JournalAttribute::Title("Fancy Journal")).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryRepository;
pub use repository::{JournalAttribute, JournalRepository};
pub use store::{PgJournalStore, StoreConfig};

// Re-export doi-core for downstream crates
pub use doi_core;
