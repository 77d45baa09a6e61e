use std::fmt::{Debug, Formatter, Result as FmtResult};

/// An API key authorizing requests to the video platform.
///
/// Opaque and immutable. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw key. Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// The raw key, for placing on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short non-secret label for logs: the last four characters.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let count = self.0.chars().count();
        let tail: String = self.0.chars().skip(count.saturating_sub(4)).collect();
        format!("…{tail}")
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Credential").field(&"***").finish()
    }
}
