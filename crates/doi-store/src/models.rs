//! Database models for the storage layer.
//!
//! These types map directly to database rows and are kept separate from
//! the domain types in doi-core.

use chrono::{DateTime, Utc};
use doi_core::{IdentifierSet, JournalId, JournalRecord, TypedIdentifier};
use sqlx::FromRow;

/// Database row for the `journals` table.
#[derive(Debug, Clone, FromRow)]
pub struct JournalRow {
    pub id: String,
    pub title: Option<String>,
    /// Serialized `"kind:value"` identifiers, in first-seen order.
    pub identifiers: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<JournalRow> for JournalRecord {
    fn from(row: JournalRow) -> Self {
        Self {
            id: JournalId::new(row.id),
            title: row.title,
            identifiers: row
                .identifiers
                .into_iter()
                .map(TypedIdentifier::from_serialized)
                .collect::<IdentifierSet>(),
        }
    }
}
