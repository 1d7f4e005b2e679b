//! Proxy subscription merger library.
//!
//! Fetches a list of subscription sources, pulls every subscription
//! concurrently, merges the decoded payloads with inline entries and serves
//! the result base64-encoded over HTTP.

pub mod aggregator;
pub mod codec;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod service;
pub mod sources;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::SubscriptionService;
