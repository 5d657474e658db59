//! Repository contract consumed by the resolution engine.
//!
//! The resolver only ever talks to storage through `JournalRepository`, so
//! the same engine runs against PostgreSQL in production and against
//! `MemoryRepository` in tests.

use async_trait::async_trait;
use doi_core::{JournalCandidate, JournalId, JournalRecord, TypedIdentifier};

use crate::error::StoreResult;

/// Attribute of a journal record that can be queried for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalAttribute<'a> {
    /// Records whose title equals the value.
    Title(&'a str),
    /// Records whose identifier set contains the value.
    Identifier(&'a TypedIdentifier),
}

/// Persistence operations the resolver needs from the repository.
///
/// Implementations must be immediately consistent with their own query
/// results: an id returned by `find_by_attribute` must be readable.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Ids of journals matching the attribute, in a stable order.
    ///
    /// Returns an empty list (not an error) when nothing matches.
    async fn find_by_attribute(&self, attribute: JournalAttribute<'_>)
        -> StoreResult<Vec<JournalId>>;

    /// Read a journal by id; `None` if it does not exist.
    async fn read(&self, id: &JournalId) -> StoreResult<Option<JournalRecord>>;

    /// Persist a new journal from the candidate and return it with its
    /// repository-assigned id.
    async fn create(&self, candidate: &JournalCandidate) -> StoreResult<JournalRecord>;

    /// Overwrite title and identifiers of an existing journal.
    ///
    /// Fails with `StoreError::JournalNotFound` if the record no longer exists.
    async fn update(&self, record: &JournalRecord) -> StoreResult<()>;
}
