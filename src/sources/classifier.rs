//! Line classification.
//!
//! # Responsibilities
//! - Split raw source-list lines into subscription endpoints and inline entries
//! - Drop blank and unrecognized lines
//!
//! # Design Decisions
//! - Lines are trimmed before matching
//! - Both rules are evaluated for every line; the subscription rule wins
//! - Inline prefixes are configurable, `vless://` by default

use serde::Serialize;

use crate::sources::entry::{InlineEntry, SubscriptionEndpoint};

/// Prefix that marks a subscription endpoint.
pub const SUBSCRIPTION_PREFIX: &str = "http";

/// Inline prefixes used when none are configured.
pub const DEFAULT_INLINE_PREFIXES: &[&str] = &["vless://"];

/// What a single line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Subscription,
    Inline,
    Ignored,
}

/// Result of classifying a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub endpoints: Vec<SubscriptionEndpoint>,
    pub inline: Vec<InlineEntry>,
    /// Number of dropped lines, blanks included.
    pub ignored: usize,
}

impl Classified {
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty() && self.inline.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LineClassifier {
    inline_prefixes: Vec<String>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_INLINE_PREFIXES.iter().copied())
    }
}

impl LineClassifier {
    pub fn new<I, S>(inline_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inline_prefixes: inline_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify one line. The caller is expected to have trimmed it.
    pub fn kind(&self, line: &str) -> LineKind {
        let is_subscription = line.starts_with(SUBSCRIPTION_PREFIX);
        let is_inline = self
            .inline_prefixes
            .iter()
            .any(|p| line.starts_with(p.as_str()));

        match (is_subscription, is_inline) {
            (true, _) => LineKind::Subscription,
            (false, true) => LineKind::Inline,
            (false, false) => LineKind::Ignored,
        }
    }

    pub fn classify<I, S>(&self, lines: I) -> Classified
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Classified::default();

        for line in lines {
            let line = line.as_ref().trim();
            match self.kind(line) {
                LineKind::Subscription => out.endpoints.push(SubscriptionEndpoint::new(line)),
                LineKind::Inline => out.inline.push(InlineEntry::new(line)),
                LineKind::Ignored => out.ignored += 1,
            }
        }

        out
    }
}
