//! Journal lookup route.
//!
//! - GET /journal?doi=<doi> - Resolve the journal a DOI was published in

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use doi_resolver::ResolveOutcome;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for GET /journal.
#[derive(Debug, Deserialize)]
pub struct JournalQuery {
    /// DOI, bare or prefixed with a doi.org resolver URL.
    #[serde(default)]
    pub doi: Option<String>,
}

/// Response for GET /journal.
#[derive(Debug, Serialize)]
pub struct JournalResponse {
    /// Public id of the resolved journal.
    #[serde(rename = "journal-id")]
    pub journal_id: String,
    /// Registry work document the journal was resolved from.
    pub crossref: Value,
}

/// GET /journal - Resolve a DOI to a journal.
async fn lookup_journal(
    State(state): State<AppState>,
    Query(query): Query<JournalQuery>,
) -> ApiResult<Json<JournalResponse>> {
    let raw = query.doi.unwrap_or_default();

    match state.resolver().resolve(&raw).await? {
        ResolveOutcome::Resolved(resolution) => Ok(Json(JournalResponse {
            journal_id: state.externalizer().externalize(&resolution.journal.id),
            crossref: resolution.metadata,
        })),
        ResolveOutcome::InsufficientInformation { doi } => {
            Err(ApiError::InsufficientInformation(format!(
                "insufficient information to locate or specify a journal entry for {doi}"
            )))
        }
    }
}

/// Build journal routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/journal", get(lookup_journal))
}
