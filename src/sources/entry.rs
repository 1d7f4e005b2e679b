//! Source list entries.

use std::fmt;

use serde::Serialize;

/// A subscription URL that yields a payload once a client id is appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionEndpoint(String);

impl SubscriptionEndpoint {
    pub(crate) fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    pub fn base(&self) -> &str {
        &self.0
    }

    /// The upstream URL for `client_id`. Plain concatenation, no escaping.
    pub fn url_for(&self, client_id: &str) -> String {
        format!("{}{}", self.0, client_id)
    }
}

impl fmt::Display for SubscriptionEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A self-contained proxy configuration line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InlineEntry(String);

impl InlineEntry {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for InlineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
