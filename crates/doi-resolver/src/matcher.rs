//! Identity Matcher: find the existing journal that best matches a candidate.
//!
//! Every identifier of the candidate and its title are queried independently.
//! Each record id returned by a query scores one point for that query, so a
//! record sharing the title and two identifiers scores 3. Any single shared
//! attribute is enough to claim identity.
//!
//! Ties on the highest score go to the record that was first returned,
//! with identifier queries running in candidate order before the title
//! query. Given the same repository contents this is deterministic.

use std::collections::HashMap;

use doi_core::{JournalCandidate, JournalId};
use doi_store::{JournalAttribute, JournalRepository, StoreResult};

/// Lowest score that still counts as a match.
pub const MINIMUM_QUALIFYING_SCORE: u32 = 1;

/// A record id with the number of attributes it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMatch {
    pub id: JournalId,
    pub score: u32,
}

/// Attribute-overlap scores keyed by record id, in first-seen order.
///
/// Every entry has a score of at least 1.
#[derive(Debug, Clone, Default)]
pub struct MatchScore {
    entries: Vec<ScoredMatch>,
    index: HashMap<JournalId, usize>,
}

impl MatchScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit every id in one query's result with a single point.
    ///
    /// An id repeated within the same result is only credited once.
    pub fn record_hits(&mut self, ids: &[JournalId]) {
        let mut credited: Vec<&JournalId> = Vec::with_capacity(ids.len());
        for id in ids {
            if credited.contains(&id) {
                continue;
            }
            credited.push(id);

            match self.index.get(id) {
                Some(&i) => self.entries[i].score += 1,
                None => {
                    self.index.insert(id.clone(), self.entries.len());
                    self.entries.push(ScoredMatch {
                        id: id.clone(),
                        score: 1,
                    });
                }
            }
        }
    }

    /// Score for an id, if it matched anything.
    pub fn score_of(&self, id: &JournalId) -> Option<u32> {
        self.index.get(id).map(|&i| self.entries[i].score)
    }

    /// Highest-scoring match; the earliest seen wins a tie.
    pub fn best(&self) -> Option<&ScoredMatch> {
        self.entries
            .iter()
            .filter(|m| m.score >= MINIMUM_QUALIFYING_SCORE)
            .fold(None, |best: Option<&ScoredMatch>, m| match best {
                Some(b) if b.score >= m.score => Some(b),
                _ => Some(m),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Query the repository for every attribute of the candidate and score hits.
///
/// Never mutates the repository.
pub async fn score_candidates(
    repository: &dyn JournalRepository,
    candidate: &JournalCandidate,
) -> StoreResult<MatchScore> {
    let mut scores = MatchScore::new();

    for identifier in &candidate.identifiers {
        let ids = repository
            .find_by_attribute(JournalAttribute::Identifier(identifier))
            .await?;
        scores.record_hits(&ids);
    }

    if let Some(title) = candidate.title() {
        let ids = repository
            .find_by_attribute(JournalAttribute::Title(title))
            .await?;
        scores.record_hits(&ids);
    }

    Ok(scores)
}

/// Select the best-matching existing journal id, or `None` if nothing matched.
pub async fn find_best_match(
    repository: &dyn JournalRepository,
    candidate: &JournalCandidate,
) -> StoreResult<Option<JournalId>> {
    let scores = score_candidates(repository, candidate).await?;

    match scores.best() {
        Some(best) => {
            tracing::debug!(
                journal_id = %best.id,
                score = best.score,
                candidates = scores.len(),
                "Selected best journal match"
            );
            Ok(Some(best.id.clone()))
        }
        None => {
            tracing::debug!("No existing journal matches candidate");
            Ok(None)
        }
    }
}
