//! Source list subsystem.
//!
//! # Data Flow
//! ```text
//! Local document or remote document (provider.rs)
//!     → raw lines
//!     → classifier.rs (trim, match prefixes)
//!     → Classified { endpoints, inline }
//! ```
//!
//! # Design Decisions
//! - The list is fetched once per request, nothing is cached
//! - Exactly one attempt, no retries
//! - Local and remote failures share one error type

pub mod classifier;
pub mod entry;
pub mod provider;

pub use classifier::{Classified, LineClassifier, LineKind};
pub use entry::{InlineEntry, SubscriptionEndpoint};
pub use provider::{LocalFileProvider, RemoteProvider, SourceError, SourceListProvider};
