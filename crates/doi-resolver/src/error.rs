//! Error types for journal resolution.

use doi_core::{DoiError, JournalId};
use doi_store::StoreError;

use crate::admission::AdmissionError;
use crate::candidate::UnparsableMetadata;
use crate::crossref::FetchError;

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Failures of a single resolution attempt.
///
/// "Insufficient information" is deliberately absent: it is a normal outcome
/// and is reported through `ResolveOutcome`, not as an error.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The DOI failed the syntax check; no work was started.
    #[error(transparent)]
    InvalidDoi(#[from] DoiError),

    /// Another lookup for the same DOI holds a live lease.
    #[error("there is already an active request for {0}; try again later")]
    AlreadyInProgress(String),

    /// The registry has no record for the DOI.
    #[error("the resource for {0} could not be found on the registry")]
    NotFoundUpstream(String),

    /// The registry could not be reached or answered with a failure.
    #[error("registry request failed: {0}")]
    UpstreamUnavailable(String),

    /// The registry answered, but not with a usable work document.
    #[error("{0}")]
    MetadataUnparsable(#[from] UnparsableMetadata),

    /// A journal id returned by a repository query could not be read back.
    #[error("journal {0} was found but could not be retrieved")]
    InvariantViolation(JournalId),

    /// Repository failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<AdmissionError> for ResolveError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::AlreadyInProgress(key) => Self::AlreadyInProgress(key),
        }
    }
}

impl From<FetchError> for ResolveError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(doi) => Self::NotFoundUpstream(doi),
            FetchError::Unavailable(reason) => Self::UpstreamUnavailable(reason),
            FetchError::Unparsable(reason) => Self::MetadataUnparsable(UnparsableMetadata(reason)),
        }
    }
}
