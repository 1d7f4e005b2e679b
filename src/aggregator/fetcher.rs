//! Single-subscription fetch.
//!
//! # Responsibilities
//! - GET `<endpoint><client_id>` once, bounded by a short timeout
//! - Decode the base64 body into raw bytes
//! - Swallow every failure into an absent outcome, logging it
//!
//! # Design Decisions
//! - Decode errors are failures, never partial payloads
//! - No retries; the next request tries again

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::codec::{self, DecodeError};
use crate::observability::metrics;
use crate::sources::SubscriptionEndpoint;

/// Decoded payload of one subscription, or `None` when it failed.
pub type FetchOutcome = Option<Vec<u8>>;

/// Why a subscription produced nothing. Only ever logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("body is not valid base64: {0}")]
    Decode(#[from] DecodeError),
}

#[async_trait]
pub trait SubscriptionFetcher: Send + Sync {
    async fn fetch(&self, endpoint: &SubscriptionEndpoint, client_id: &str) -> FetchOutcome;
}

/// Fetches subscriptions over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSubscriptionFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpSubscriptionFetcher {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let body = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(codec::decode_subscription(&body)?)
    }
}

#[async_trait]
impl SubscriptionFetcher for HttpSubscriptionFetcher {
    async fn fetch(&self, endpoint: &SubscriptionEndpoint, client_id: &str) -> FetchOutcome {
        let url = endpoint.url_for(client_id);
        let start = Instant::now();

        match self.try_fetch(&url).await {
            Ok(bytes) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    bytes = bytes.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Subscription fetched"
                );
                metrics::record_fetch(true);
                Some(bytes)
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Can't get subscription");
                metrics::record_fetch(false);
                None
            }
        }
    }
}
