//! DOI syntax checking.
//!
//! Accepts a bare DOI (`10.4137/cmc.s38446`) or one prefixed with a
//! resolver URL (`https://dx.doi.org/10.4137/cmc.s38446`). Everything up to
//! and including the first `doi.org/` is stripped before the pattern check.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker that separates a resolver URL prefix from the DOI itself.
const RESOLVER_MARKER: &str = "doi.org/";

static DOI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^10\.\d{4,9}/[-._;()/:a-zA-Z0-9]+$").expect("DOI pattern is valid")
});

/// Errors produced while checking DOI syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DoiError {
    /// No DOI was supplied.
    #[error("no DOI supplied")]
    Missing,

    /// The DOI does not match the registry format.
    #[error("supplied DOI is not in valid Crossref format: {0}")]
    Malformed(String),
}

/// A syntactically valid DOI with any resolver prefix removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Doi(String);

impl Doi {
    /// Parse and normalize a DOI, stripping a leading `…doi.org/` prefix.
    pub fn parse(input: &str) -> Result<Self, DoiError> {
        if input.is_empty() {
            return Err(DoiError::Missing);
        }

        let suffix = match input.find(RESOLVER_MARKER) {
            Some(i) => &input[i + RESOLVER_MARKER.len()..],
            None => input,
        };

        if DOI_RE.is_match(suffix) {
            Ok(Self(suffix.to_string()))
        } else {
            Err(DoiError::Malformed(input.to_string()))
        }
    }

    /// The normalized DOI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Doi {
    type Err = DoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Doi {
    type Error = DoiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Doi> for String {
    fn from(doi: Doi) -> Self {
        doi.0
    }
}

impl AsRef<str> for Doi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_resolver_prefixes() {
        for input in [
            "http://dx.doi.org/10.4137/cmc.s38446",
            "https://dx.doi.org/10.4137/cmc.s38446",
            "dx.doi.org/10.4137/cmc.s38446",
            "https://doi.org/10.4137/cmc.s38446",
            "10.4137/cmc.s38446",
        ] {
            let doi = Doi::parse(input).unwrap();
            assert_eq!(doi.as_str(), "10.4137/cmc.s38446", "input: {input}");
        }
    }

    #[test]
    fn rejects_missing_directory_indicator() {
        assert_eq!(
            Doi::parse("4137/cmc.s38446"),
            Err(DoiError::Malformed("4137/cmc.s38446".to_string()))
        );
    }

    #[test]
    fn rejects_short_registrant_code() {
        assert!(Doi::parse("10.123/abc").is_err());
    }

    #[test]
    fn rejects_characters_outside_suffix_alphabet() {
        assert!(Doi::parse("10.1234/abc def").is_err());
        assert!(Doi::parse("10.1234/abc<script>").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Doi::parse(""), Err(DoiError::Missing));
    }

    #[test]
    fn surrounding_whitespace_is_not_stripped() {
        assert_eq!(
            Doi::parse(" 10.1234/abc "),
            Err(DoiError::Malformed(" 10.1234/abc ".to_string()))
        );
        assert!(Doi::parse("   ").is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: Doi = serde_json::from_str("\"10.1212/abc.DEF\"").unwrap();
        assert_eq!(ok.to_string(), "10.1212/abc.DEF");

        let bad: Result<Doi, _> = serde_json::from_str("\"not-a-doi\"");
        assert!(bad.is_err());
    }
}
