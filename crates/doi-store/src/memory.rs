//! In-memory journal repository.
//!
//! Keeps journals in insertion order behind a `RwLock`. Used by the server
//! when no database is configured and by tests, which rely on the write
//! counters to check that re-resolving a complete journal writes nothing.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use doi_core::{JournalCandidate, JournalId, JournalRecord};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::repository::{JournalAttribute, JournalRepository};

/// Default base URI for ids minted by the in-memory repository.
pub const DEFAULT_MEMORY_BASE_URI: &str = "memory://journals/";

/// Process-local journal repository.
#[derive(Debug)]
pub struct MemoryRepository {
    base_uri: String,
    journals: RwLock<Vec<JournalRecord>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    /// Creates an empty repository minting ids under `memory://journals/`.
    pub fn new() -> Self {
        Self::with_base_uri(DEFAULT_MEMORY_BASE_URI)
    }

    /// Creates an empty repository minting ids under `base_uri`.
    pub fn with_base_uri(base_uri: &str) -> Self {
        let mut base_uri = base_uri.to_string();
        if !base_uri.ends_with('/') {
            base_uri.push('/');
        }
        Self {
            base_uri,
            journals: RwLock::new(Vec::new()),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    /// Seed a record as-is. Not counted as a write.
    pub fn insert(&self, record: JournalRecord) -> StoreResult<()> {
        let mut journals = self.journals.write().map_err(|_| StoreError::LockPoisoned)?;
        journals.retain(|j| j.id != record.id);
        journals.push(record);
        Ok(())
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.journals.read().map(|j| j.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful `create` calls.
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of successful `update` calls.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Total writes (creates plus updates).
    pub fn write_count(&self) -> usize {
        self.create_count() + self.update_count()
    }

    fn mint_id(&self) -> JournalId {
        JournalId::new(format!("{}{}", self.base_uri, Uuid::new_v4()))
    }
}

#[async_trait]
impl JournalRepository for MemoryRepository {
    async fn find_by_attribute(
        &self,
        attribute: JournalAttribute<'_>,
    ) -> StoreResult<Vec<JournalId>> {
        let journals = self.journals.read().map_err(|_| StoreError::LockPoisoned)?;
        let ids = journals
            .iter()
            .filter(|j| match attribute {
                JournalAttribute::Title(title) => j.title.as_deref() == Some(title),
                JournalAttribute::Identifier(id) => j.identifiers.contains(id),
            })
            .map(|j| j.id.clone())
            .collect();
        Ok(ids)
    }

    async fn read(&self, id: &JournalId) -> StoreResult<Option<JournalRecord>> {
        let journals = self.journals.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(journals.iter().find(|j| &j.id == id).cloned())
    }

    async fn create(&self, candidate: &JournalCandidate) -> StoreResult<JournalRecord> {
        let record = JournalRecord {
            id: self.mint_id(),
            title: candidate.title.clone(),
            identifiers: candidate.identifiers.clone(),
        };

        let mut journals = self.journals.write().map_err(|_| StoreError::LockPoisoned)?;
        journals.push(record.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(journal_id = %record.id, "Created journal in memory");
        Ok(record)
    }

    async fn update(&self, record: &JournalRecord) -> StoreResult<()> {
        let mut journals = self.journals.write().map_err(|_| StoreError::LockPoisoned)?;
        let existing = journals
            .iter_mut()
            .find(|j| j.id == record.id)
            .ok_or_else(|| StoreError::JournalNotFound(record.id.clone()))?;

        existing.title = record.title.clone();
        existing.identifiers = record.identifiers.clone();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
