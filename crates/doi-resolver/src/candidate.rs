//! Candidate Builder: registry work metadata to `JournalCandidate`.
//!
//! The registry document is decoded into a typed shape before any field is
//! read. Only the fields the resolver consumes are modelled:
//!
//! ```json
//! { "message": {
//!     "container-title": ["Clinical Medicine Insights: Cardiology"],
//!     "issn-type": [{"value": "1179-5468", "type": "print"}],
//!     "ISSN": ["1179-5468", "1234-5678"] } }
//! ```
//!
//! Pure transform, no I/O.

use std::collections::HashSet;

use doi_core::{IdentifierKind, IdentifierSet, JournalCandidate, TypedIdentifier};
use serde::Deserialize;
use serde_json::Value;

/// Error raised when the metadata document does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("metadata unparsable: {0}")]
pub struct UnparsableMetadata(pub String);

/// Top-level registry response for a single work.
#[derive(Debug, Deserialize)]
struct WorkDocument {
    message: WorkMessage,
}

#[derive(Debug, Default, Deserialize)]
struct WorkMessage {
    #[serde(rename = "container-title", default)]
    container_title: Option<Vec<Option<String>>>,

    #[serde(rename = "issn-type", default)]
    issn_type: Option<Vec<TypedIssn>>,

    #[serde(rename = "ISSN", default)]
    issn: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TypedIssn {
    #[serde(rename = "type", default)]
    kind: Option<String>,

    #[serde(default)]
    value: Option<String>,
}

/// Build a candidate from a parsed registry work document.
pub fn build_candidate(document: &Value) -> Result<JournalCandidate, UnparsableMetadata> {
    let document =
        WorkDocument::deserialize(document).map_err(|e| UnparsableMetadata(e.to_string()))?;
    Ok(candidate_from_message(document.message))
}

/// Build a candidate from raw JSON text.
pub fn build_candidate_from_str(json: &str) -> Result<JournalCandidate, UnparsableMetadata> {
    let document: WorkDocument =
        serde_json::from_str(json).map_err(|e| UnparsableMetadata(e.to_string()))?;
    Ok(candidate_from_message(document.message))
}

fn candidate_from_message(message: WorkMessage) -> JournalCandidate {
    let title = message
        .container_title
        .and_then(|titles| titles.into_iter().next())
        .flatten();

    let mut identifiers = IdentifierSet::new();
    // Raw values of typed entries, so the untyped list does not repeat them.
    let mut seen_values: HashSet<String> = HashSet::new();

    for entry in message.issn_type.unwrap_or_default() {
        let value = entry.value.unwrap_or_default();
        let kind = IdentifierKind::from_registry(entry.kind.as_deref().unwrap_or_default());

        if !value.is_empty() {
            identifiers.insert(TypedIdentifier::new(kind, &value));
        }
        seen_values.insert(value);
    }

    for value in message.issn.unwrap_or_default() {
        if value.is_empty() || seen_values.contains(&value) {
            continue;
        }
        identifiers.insert(TypedIdentifier::unspecified(&value));
    }

    tracing::debug!(
        title = title.as_deref().unwrap_or(""),
        identifiers = identifiers.len(),
        "Built journal candidate"
    );

    JournalCandidate::new(title, identifiers)
}
