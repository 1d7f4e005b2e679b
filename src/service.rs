//! Per-request subscription pipeline.
//!
//! source list → classify → fan-out fetch → merge. Everything here is request
//! scoped; the only shared state is the immutable configuration.

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;

use crate::aggregator::{Aggregator, HttpSubscriptionFetcher, MergedPayload, NothingToReturn};
use crate::config::AppConfig;
use crate::sources::{provider, LineClassifier, SourceError, SourceListProvider};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Merge(#[from] NothingToReturn),
}

pub struct SubscriptionService {
    provider: Arc<dyn SourceListProvider>,
    classifier: LineClassifier,
    aggregator: Aggregator,
}

impl SubscriptionService {
    pub fn new(provider: Arc<dyn SourceListProvider>, classifier: LineClassifier, aggregator: Aggregator) -> Self {
        Self {
            provider,
            classifier,
            aggregator,
        }
    }

    /// Wire up the HTTP-backed pipeline described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.subscriptions.user_agent.as_str())
            .build()?;

        let provider = provider::from_config(&config.source_list, client.clone());
        let classifier = LineClassifier::new(config.subscriptions.inline_prefixes.iter().cloned());
        let fetcher = HttpSubscriptionFetcher::new(client, config.subscriptions.timeout());

        Ok(Self::new(provider, classifier, Aggregator::new(Arc::new(fetcher))))
    }

    /// Build the merged payload for one client.
    pub async fn build(&self, client_id: &str) -> Result<MergedPayload, ServiceError> {
        let lines = self.provider.fetch().await.inspect_err(|e| {
            tracing::error!(error = %e, "Source list unavailable");
        })?;

        let classified = self.classifier.classify(&lines);
        tracing::debug!(
            endpoints = classified.endpoints.len(),
            inline = classified.inline.len(),
            ignored = classified.ignored,
            "Source list classified"
        );

        if classified.is_empty() {
            tracing::error!("No subscriptions or configurations available");
            return Err(NothingToReturn.into());
        }

        let merged = self
            .aggregator
            .merge(&classified.endpoints, &classified.inline, client_id)
            .await?;
        Ok(merged)
    }
}
