//! Rewrites repository-internal journal ids into public ones.

use doi_core::JournalId;

/// Maps journal ids under the internal prefix to the public prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdExternalizer {
    internal_prefix: String,
    public_prefix: String,
}

impl IdExternalizer {
    pub fn new(internal_prefix: &str, public_prefix: &str) -> Self {
        Self {
            internal_prefix: with_trailing_slash(internal_prefix),
            public_prefix: with_trailing_slash(public_prefix),
        }
    }

    /// Public form of `id`. Ids outside the internal prefix pass through.
    pub fn externalize(&self, id: &JournalId) -> String {
        match id.as_str().strip_prefix(&self.internal_prefix) {
            Some(rest) => format!("{}{}", self.public_prefix, rest),
            None => id.as_str().to_string(),
        }
    }
}

fn with_trailing_slash(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    }
}
