//! Aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! endpoints[0..n] + client id
//!     → merge.rs spawns one task per endpoint
//!     → fetcher.rs (GET, timeout, base64 decode) → Option<bytes>
//!     → join in input order
//!     → merge_outcomes (successes, then inline entries joined by '\n')
//! ```
//!
//! # Design Decisions
//! - Unbounded fan-out; the operator controls the source list size
//! - Per-source failures are logged and never propagated
//! - Output order is input order, not completion order

pub mod fetcher;
pub mod merge;

pub use fetcher::{FetchError, FetchOutcome, HttpSubscriptionFetcher, SubscriptionFetcher};
pub use merge::{merge_outcomes, Aggregator, MergedPayload, NothingToReturn};
