//! doi-resolver: Journal identity resolution and merge engine
//!
//! This crate provides:
//! - Candidate building from registry work metadata
//! - Identity matching of candidates against stored journals
//! - Gap-filling merge of candidates into the repository
//! - A request admission gate rejecting concurrent lookups of one DOI
//! - A Crossref client for fetching work metadata
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use doi_resolver::{AdmissionGate, CrossrefClient, CrossrefConfig, JournalResolver};
//! use doi_store::MemoryRepository;
//!
//! let resolver = JournalResolver::new(
//!     Arc::new(MemoryRepository::new()),
//!     Arc::new(CrossrefClient::new(CrossrefConfig::default())?),
//!     AdmissionGate::default(),
//! );
//!
//! let outcome = resolver.resolve("10.4137/cmc.s38446").await?;
//! ```

pub mod admission;
pub mod candidate;
pub mod crossref;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod resolver;

pub use admission::{AdmissionError, AdmissionGate, AdmissionLease, DEFAULT_LEASE_DURATION};
pub use candidate::{UnparsableMetadata, build_candidate, build_candidate_from_str};
pub use crossref::{CrossrefClient, CrossrefConfig, FetchError, MetadataSource};
pub use error::{ResolveError, ResolveResult};
pub use matcher::{MatchScore, ScoredMatch, find_best_match, score_candidates};
pub use merge::{MergeAction, MergeOutcome, fill_gaps, merge};
pub use resolver::{JournalResolver, Resolution, ResolveOutcome};

// Re-export dependent crates
pub use doi_core;
pub use doi_store;
