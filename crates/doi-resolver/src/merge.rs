//! Merge Resolver: create, fill gaps in, or reuse a journal record.
//!
//! Existing records are authoritative. A merge only ever fills gaps:
//! - an absent or empty title is set from the candidate; a present one is
//!   never replaced
//! - identifiers become the union of existing and candidate, existing
//!   entries first
//!
//! When nothing changes no write is issued, so resolving the same complete
//! candidate twice is a no-op the second time.

use doi_core::{JournalCandidate, JournalId, JournalRecord};
use doi_store::JournalRepository;
use serde::Serialize;

use crate::error::{ResolveError, ResolveResult};

/// What the merge did to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeAction {
    Created,
    Updated,
    Unchanged,
}

/// Result of merging a candidate into the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A record was produced (created, updated, or untouched).
    Merged {
        record: JournalRecord,
        action: MergeAction,
    },
    /// No match, and the candidate lacks a title or identifiers.
    InsufficientInformation,
}

impl MergeOutcome {
    /// The resulting record, if any.
    pub fn record(&self) -> Option<&JournalRecord> {
        match self {
            Self::Merged { record, .. } => Some(record),
            Self::InsufficientInformation => None,
        }
    }

    pub fn action(&self) -> Option<MergeAction> {
        match self {
            Self::Merged { action, .. } => Some(*action),
            Self::InsufficientInformation => None,
        }
    }
}

/// Apply the gap-filling policy to an existing record.
///
/// Returns the filled record only if something changed.
pub fn fill_gaps(existing: &JournalRecord, candidate: &JournalCandidate) -> Option<JournalRecord> {
    let mut merged = existing.clone();
    let mut changed = false;

    if existing.title().is_none() {
        if let Some(title) = candidate.title() {
            merged.title = Some(title.to_string());
            changed = true;
        }
    }

    if !existing.identifiers.contains_all(&candidate.identifiers) {
        merged.identifiers = existing.identifiers.union(&candidate.identifiers);
        changed = true;
    }

    changed.then_some(merged)
}

/// Reconcile the candidate with the matched record (or its absence).
pub async fn merge(
    repository: &dyn JournalRepository,
    candidate: &JournalCandidate,
    matched: Option<&JournalId>,
) -> ResolveResult<MergeOutcome> {
    let Some(id) = matched else {
        if !candidate.is_creatable() {
            tracing::warn!(
                title = candidate.title.as_deref().unwrap_or(""),
                identifiers = candidate.identifiers.len(),
                "Not enough information to create a journal"
            );
            return Ok(MergeOutcome::InsufficientInformation);
        }

        let record = repository.create(candidate).await?;
        tracing::info!(journal_id = %record.id, "Created journal");
        return Ok(MergeOutcome::Merged {
            record,
            action: MergeAction::Created,
        });
    };

    let Some(existing) = repository.read(id).await? else {
        tracing::error!(
            journal_id = %id,
            "Journal id was found but the record could not be retrieved"
        );
        return Err(ResolveError::InvariantViolation(id.clone()));
    };

    match fill_gaps(&existing, candidate) {
        Some(updated) => {
            repository.update(&updated).await?;
            tracing::info!(
                journal_id = %updated.id,
                identifiers = updated.identifiers.len(),
                "Updated journal with new information"
            );
            Ok(MergeOutcome::Merged {
                record: updated,
                action: MergeAction::Updated,
            })
        }
        None => {
            tracing::debug!(journal_id = %existing.id, "Journal already complete");
            Ok(MergeOutcome::Merged {
                record: existing,
                action: MergeAction::Unchanged,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doi_core::{IdentifierKind, TypedIdentifier};
    use doi_store::{JournalAttribute, MemoryRepository, StoreResult};

    fn print(value: &str) -> TypedIdentifier {
        TypedIdentifier::new(IdentifierKind::Print, value)
    }

    fn online(value: &str) -> TypedIdentifier {
        TypedIdentifier::new(IdentifierKind::Electronic, value)
    }

    fn record(id: &str, title: Option<&str>, ids: Vec<TypedIdentifier>) -> JournalRecord {
        JournalRecord {
            id: JournalId::new(id),
            title: title.map(str::to_string),
            identifiers: ids.into_iter().collect(),
        }
    }

    fn candidate(title: Option<&str>, ids: Vec<TypedIdentifier>) -> JournalCandidate {
        JournalCandidate::new(title.map(str::to_string), ids.into_iter().collect())
    }

    #[test]
    fn fill_gaps_sets_missing_title_only() {
        let existing = record("x", None, vec![print("1")]);
        let filled = fill_gaps(&existing, &candidate(Some("T"), vec![print("1")])).unwrap();
        assert_eq!(filled.title.as_deref(), Some("T"));

        let empty_title = record("x", Some(""), vec![print("1")]);
        let filled = fill_gaps(&empty_title, &candidate(Some("T"), vec![])).unwrap();
        assert_eq!(filled.title.as_deref(), Some("T"));

        let titled = record("x", Some("X"), vec![print("1")]);
        assert_eq!(fill_gaps(&titled, &candidate(Some("Y"), vec![print("1")])), None);
    }

    #[test]
    fn fill_gaps_appends_new_identifiers_after_existing() {
        let existing = record("x", Some("X"), vec![print("A")]);
        let filled = fill_gaps(&existing, &candidate(None, vec![print("B"), print("A")])).unwrap();
        assert_eq!(filled.identifiers.to_strings(), vec!["Print:A", "Print:B"]);
        assert_eq!(filled.title.as_deref(), Some("X"));
    }

    #[tokio::test]
    async fn creates_when_unmatched_and_complete() {
        let repo = MemoryRepository::new();
        let c = candidate(
            Some("Advanced Research in Animal Husbandry"),
            vec![TypedIdentifier::from_serialized("MOO")],
        );

        let outcome = merge(&repo, &c, None).await.unwrap();
        let created = outcome.record().unwrap();
        assert_eq!(outcome.action(), Some(MergeAction::Created));
        assert_eq!(created.title, c.title);
        assert_eq!(created.identifiers, c.identifiers);
        assert_eq!(repo.create_count(), 1);
    }

    #[tokio::test]
    async fn insufficient_when_unmatched_and_incomplete() {
        let repo = MemoryRepository::new();

        for c in [
            candidate(None, vec![]),
            // Identifiers without a title never create a journal.
            candidate(None, vec![TypedIdentifier::from_serialized("MOO")]),
            candidate(Some("Title Only"), vec![]),
        ] {
            let outcome = merge(&repo, &c, None).await.unwrap();
            assert_eq!(outcome, MergeOutcome::InsufficientInformation);
        }
        assert_eq!(repo.write_count(), 0);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn complete_match_performs_no_write() {
        let repo = MemoryRepository::new();
        let existing = record(
            "complete",
            Some("Fancy Journal"),
            vec![print("0000-0001"), online("0000-0002")],
        );
        repo.insert(existing.clone()).unwrap();

        let c = candidate(Some("Fancy Journal"), vec![print("0000-0001"), online("0000-0002")]);
        let outcome = merge(&repo, &c, Some(&existing.id)).await.unwrap();

        assert_eq!(outcome.action(), Some(MergeAction::Unchanged));
        assert_eq!(outcome.record(), Some(&existing));
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn gap_fill_is_persisted() {
        let repo = MemoryRepository::new();
        let existing = record("one-issn", Some("Fancy Journal"), vec![online("0000-0005")]);
        repo.insert(existing.clone()).unwrap();

        let c = candidate(None, vec![online("0000-0005"), online("0000-0006")]);
        let outcome = merge(&repo, &c, Some(&existing.id)).await.unwrap();

        assert_eq!(outcome.action(), Some(MergeAction::Updated));
        let stored = repo.read(&existing.id).await.unwrap().unwrap();
        assert_eq!(
            stored.identifiers.to_strings(),
            vec!["Online:0000-0005", "Online:0000-0006"]
        );
        assert_eq!(stored.title.as_deref(), Some("Fancy Journal"));
        assert_eq!(repo.update_count(), 1);
    }

    /// Repository whose queries return an id its reads cannot find.
    struct InconsistentRepository;

    #[async_trait]
    impl JournalRepository for InconsistentRepository {
        async fn find_by_attribute(
            &self,
            _attribute: JournalAttribute<'_>,
        ) -> StoreResult<Vec<JournalId>> {
            Ok(vec![JournalId::new("phantom")])
        }

        async fn read(&self, _id: &JournalId) -> StoreResult<Option<JournalRecord>> {
            Ok(None)
        }

        async fn create(&self, _candidate: &JournalCandidate) -> StoreResult<JournalRecord> {
            unreachable!("create must not be called for a matched id")
        }

        async fn update(&self, _record: &JournalRecord) -> StoreResult<()> {
            unreachable!("update must not be called for an unreadable id")
        }
    }

    #[tokio::test]
    async fn unreadable_match_is_an_invariant_violation() {
        let c = candidate(Some("T"), vec![print("1")]);
        let err = merge(&InconsistentRepository, &c, Some(&JournalId::new("phantom")))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvariantViolation(id) if id.as_str() == "phantom"));
    }
}
