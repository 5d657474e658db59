//! Resolution pipeline: DOI in, canonical journal record out.
//!
//! `JournalResolver::resolve` runs, in order:
//! 1. DOI syntax check (rejects before any other work)
//! 2. admission (one live lookup per DOI)
//! 3. registry fetch
//! 4. candidate build
//! 5. identity match and merge
//!
//! The admission lease is released as soon as the lookup finishes on every
//! path, including cancellation, and in any case by its expiry timer.

use std::sync::Arc;

use doi_core::{Doi, JournalCandidate, JournalRecord};
use doi_store::JournalRepository;
use serde_json::Value;
use tracing::{debug, warn};

use crate::admission::AdmissionGate;
use crate::candidate::build_candidate;
use crate::crossref::MetadataSource;
use crate::error::{ResolveError, ResolveResult};
use crate::matcher::find_best_match;
use crate::merge::{MergeAction, MergeOutcome, merge};

/// A journal resolved for a DOI.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub doi: Doi,
    pub journal: JournalRecord,
    pub action: MergeAction,
    /// Registry work document the journal was resolved from.
    pub metadata: Value,
}

/// Terminal outcome of a successful resolution attempt.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    Resolved(Resolution),
    /// No existing journal matched and the registry metadata lacks a title
    /// or identifiers, so nothing was created.
    InsufficientInformation { doi: Doi },
}

/// Resolves DOIs to journal records.
///
/// Cheap to clone; clones share the repository, metadata source, and
/// admission gate.
#[derive(Clone)]
pub struct JournalResolver {
    repository: Arc<dyn JournalRepository>,
    metadata: Arc<dyn MetadataSource>,
    gate: AdmissionGate,
}

impl JournalResolver {
    pub fn new(
        repository: Arc<dyn JournalRepository>,
        metadata: Arc<dyn MetadataSource>,
        gate: AdmissionGate,
    ) -> Self {
        Self {
            repository,
            metadata,
            gate,
        }
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Resolve a DOI (bare or resolver-URL prefixed) to a journal.
    pub async fn resolve(&self, raw_doi: &str) -> ResolveResult<ResolveOutcome> {
        let doi = Doi::parse(raw_doi)?;

        let lease = self.gate.try_acquire(doi.as_str()).map_err(|e| {
            warn!(doi = %doi, "There is already an active request for this DOI");
            ResolveError::from(e)
        })?;

        let result = self.resolve_admitted(doi).await;
        lease.release();
        result
    }

    async fn resolve_admitted(&self, doi: Doi) -> ResolveResult<ResolveOutcome> {
        debug!(doi = %doi, "Servicing journal lookup");

        let metadata = self.metadata.fetch_work(&doi).await.map_err(|e| {
            warn!(doi = %doi, error = %e, "Registry lookup failed");
            ResolveError::from(e)
        })?;

        let candidate = build_candidate(&metadata)?;

        match self.reconcile(&candidate).await? {
            MergeOutcome::Merged { record, action } => {
                debug!(doi = %doi, journal_id = %record.id, ?action, "Resolved journal");
                Ok(ResolveOutcome::Resolved(Resolution {
                    doi,
                    journal: record,
                    action,
                    metadata,
                }))
            }
            MergeOutcome::InsufficientInformation => {
                Ok(ResolveOutcome::InsufficientInformation { doi })
            }
        }
    }

    /// Match a candidate against the repository and merge it.
    ///
    /// Not guarded by the admission gate.
    pub async fn reconcile(&self, candidate: &JournalCandidate) -> ResolveResult<MergeOutcome> {
        let matched = find_best_match(self.repository.as_ref(), candidate).await?;
        merge(self.repository.as_ref(), candidate, matched.as_ref()).await
    }
}

impl std::fmt::Debug for JournalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalResolver")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
