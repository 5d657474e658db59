//! Core data types for journal identity resolution.
//!
//! - `TypedIdentifier`: an identifier tagged with its kind, stored in its
//!   serialized `"kind:value"` form
//! - `IdentifierSet`: insertion-ordered, duplicate-free identifier collection
//! - `JournalCandidate`: ephemeral description built from registry metadata
//! - `JournalRecord`: the repository's persisted journal entity
//!
//! All types derive `Debug`, `Clone`, `Serialize`, and `Deserialize` for
//! inspection, copying, and JSON serialization.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Separator between the kind prefix and the value.
const KIND_SEPARATOR: char = ':';

/// Kind of a journal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// Print edition.
    Print,
    /// Electronic (online) edition.
    Electronic,
    /// Kind not stated by the source.
    Unspecified,
}

impl IdentifierKind {
    /// Prefix used in the repository's serialized form.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Print => "Print",
            Self::Electronic => "Online",
            Self::Unspecified => "",
        }
    }

    /// Map a registry type string (`"print"`, `"electronic"`) to a kind.
    ///
    /// Unknown strings map to `Unspecified`.
    pub fn from_registry(type_str: &str) -> Self {
        match type_str {
            "print" => Self::Print,
            "electronic" => Self::Electronic,
            _ => Self::Unspecified,
        }
    }

    /// Map a repository prefix back to a kind.
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "Print" => Some(Self::Print),
            "Online" => Some(Self::Electronic),
            "" => Some(Self::Unspecified),
            _ => None,
        }
    }
}

/// A journal identifier (typically an ISSN) in `"kind:value"` form.
///
/// Equality is exact string equality of the serialized form. Text read back
/// from the repository is kept verbatim, even when it carries no kind prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypedIdentifier(String);

impl TypedIdentifier {
    /// Creates an identifier from a kind and a value.
    #[must_use]
    pub fn new(kind: IdentifierKind, value: &str) -> Self {
        Self(format!("{}{}{}", kind.prefix(), KIND_SEPARATOR, value))
    }

    /// Creates an identifier of unspecified kind (`":value"`).
    #[must_use]
    pub fn unspecified(value: &str) -> Self {
        Self::new(IdentifierKind::Unspecified, value)
    }

    /// Wraps already-serialized text without reinterpreting it.
    #[must_use]
    pub fn from_serialized(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The serialized form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind, if the text carries a recognized prefix.
    pub fn kind(&self) -> Option<IdentifierKind> {
        self.0
            .split_once(KIND_SEPARATOR)
            .and_then(|(prefix, _)| IdentifierKind::from_prefix(prefix))
    }

    /// The value part; the whole text when no recognized prefix is present.
    pub fn value(&self) -> &str {
        match self.0.split_once(KIND_SEPARATOR) {
            Some((prefix, value)) if IdentifierKind::from_prefix(prefix).is_some() => value,
            _ => &self.0,
        }
    }
}

impl fmt::Display for TypedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypedIdentifier {
    fn from(text: &str) -> Self {
        Self::from_serialized(text)
    }
}

/// Insertion-ordered set of identifiers with duplicates collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TypedIdentifier>", into = "Vec<TypedIdentifier>")]
pub struct IdentifierSet(Vec<TypedIdentifier>);

impl IdentifierSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds an identifier. Returns false if it was already present.
    pub fn insert(&mut self, id: TypedIdentifier) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: &TypedIdentifier) -> bool {
        self.0.contains(id)
    }

    /// True if every identifier in `other` is present in `self`.
    pub fn contains_all(&self, other: &IdentifierSet) -> bool {
        other.iter().all(|id| self.contains(id))
    }

    /// Union preserving this set's order, followed by unseen entries of
    /// `other` in their order.
    #[must_use]
    pub fn union(&self, other: &IdentifierSet) -> IdentifierSet {
        let mut merged = self.clone();
        for id in other.iter() {
            merged.insert(id.clone());
        }
        merged
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypedIdentifier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized forms, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|id| id.as_str().to_string()).collect()
    }
}

impl From<Vec<TypedIdentifier>> for IdentifierSet {
    fn from(ids: Vec<TypedIdentifier>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<IdentifierSet> for Vec<TypedIdentifier> {
    fn from(set: IdentifierSet) -> Self {
        set.0
    }
}

impl FromIterator<TypedIdentifier> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = TypedIdentifier>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a TypedIdentifier;
    type IntoIter = std::slice::Iter<'a, TypedIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Journals
// ============================================================================

/// Opaque repository identifier for a journal record.
///
/// Assigned by the repository on creation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalId(String);

impl JournalId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Journal description derived from freshly fetched metadata.
///
/// Never persisted directly; owned by the resolution call that built it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalCandidate {
    pub title: Option<String>,
    pub identifiers: IdentifierSet,
}

impl JournalCandidate {
    pub fn new(title: Option<String>, identifiers: IdentifierSet) -> Self {
        Self { title, identifiers }
    }

    /// The title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    /// True if the candidate carries enough to create a new record:
    /// a non-empty title and at least one identifier.
    pub fn is_creatable(&self) -> bool {
        self.title().is_some() && !self.identifiers.is_empty()
    }
}

/// The repository's persisted journal entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub id: JournalId,
    pub title: Option<String>,
    pub identifiers: IdentifierSet,
}

impl JournalRecord {
    /// The title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_forms() {
        assert_eq!(
            TypedIdentifier::new(IdentifierKind::Print, "0000-0001").as_str(),
            "Print:0000-0001"
        );
        assert_eq!(
            TypedIdentifier::new(IdentifierKind::Electronic, "0000-0002").as_str(),
            "Online:0000-0002"
        );
        assert_eq!(TypedIdentifier::unspecified("1234-5678").as_str(), ":1234-5678");
    }

    #[test]
    fn registry_types_map_to_kinds() {
        assert_eq!(IdentifierKind::from_registry("print"), IdentifierKind::Print);
        assert_eq!(
            IdentifierKind::from_registry("electronic"),
            IdentifierKind::Electronic
        );
        assert_eq!(
            IdentifierKind::from_registry("linking"),
            IdentifierKind::Unspecified
        );
    }

    #[test]
    fn kind_and_value_parse_back() {
        let id = TypedIdentifier::new(IdentifierKind::Electronic, "0000-0002");
        assert_eq!(id.kind(), Some(IdentifierKind::Electronic));
        assert_eq!(id.value(), "0000-0002");

        let raw = TypedIdentifier::from_serialized("MOO");
        assert_eq!(raw.kind(), None);
        assert_eq!(raw.value(), "MOO");
    }

    #[test]
    fn equality_is_on_serialized_text() {
        assert_ne!(
            TypedIdentifier::new(IdentifierKind::Print, "1179-5468"),
            TypedIdentifier::new(IdentifierKind::Electronic, "1179-5468")
        );
        assert_eq!(
            TypedIdentifier::from_serialized("Print:1179-5468"),
            TypedIdentifier::new(IdentifierKind::Print, "1179-5468")
        );
    }

    #[test]
    fn set_collapses_duplicates_in_order() {
        let set: IdentifierSet = ["b", "a", "b", "c", "a"]
            .into_iter()
            .map(TypedIdentifier::from)
            .collect();
        assert_eq!(set.to_strings(), vec!["b", "a", "c"]);
    }

    #[test]
    fn union_keeps_existing_order_then_new() {
        let existing: IdentifierSet = ["A", "C"].into_iter().map(TypedIdentifier::from).collect();
        let incoming: IdentifierSet = ["B", "A", "D"]
            .into_iter()
            .map(TypedIdentifier::from)
            .collect();

        let merged = existing.union(&incoming);
        assert_eq!(merged.to_strings(), vec!["A", "C", "B", "D"]);
        assert!(merged.contains_all(&existing));
        assert!(merged.contains_all(&incoming));
        assert!(!existing.contains_all(&incoming));
    }

    #[test]
    fn candidate_creatable_requires_title_and_identifier() {
        let ids: IdentifierSet = vec![TypedIdentifier::from("MOO")].into();

        assert!(JournalCandidate::new(Some("T".into()), ids.clone()).is_creatable());
        assert!(!JournalCandidate::new(Some(String::new()), ids.clone()).is_creatable());
        assert!(!JournalCandidate::new(None, ids).is_creatable());
        assert!(!JournalCandidate::new(Some("T".into()), IdentifierSet::new()).is_creatable());
    }

    #[test]
    fn identifier_set_serializes_as_list() {
        let set: IdentifierSet = vec![
            TypedIdentifier::new(IdentifierKind::Print, "0000-0001"),
            TypedIdentifier::new(IdentifierKind::Print, "0000-0001"),
        ]
        .into();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Print:0000-0001"]"#);
    }
}
