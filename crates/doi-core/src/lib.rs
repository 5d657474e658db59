//! doi-core: Core types for the journal resolution service
//!
//! This crate provides:
//! - Typed journal identifiers (`"kind:value"` serialized form)
//! - The ephemeral `JournalCandidate` built from registry metadata
//! - The persisted `JournalRecord` shape shared with the repository
//! - DOI syntax checking
//!
//! # Usage
//!
//! ```rust
//! use doi_core::{Doi, IdentifierKind, TypedIdentifier};
//!
//! let doi = Doi::parse("https://dx.doi.org/10.4137/cmc.s38446").unwrap();
//! assert_eq!(doi.as_str(), "10.4137/cmc.s38446");
//!
//! let issn = TypedIdentifier::new(IdentifierKind::Print, "1179-5468");
//! assert_eq!(issn.as_str(), "Print:1179-5468");
//! ```

pub mod doi;
pub mod types;

pub use doi::{Doi, DoiError};
pub use types::{
    IdentifierKind, IdentifierSet, JournalCandidate, JournalId, JournalRecord, TypedIdentifier,
};
