//! Concurrent fan-out and merge policy.

use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;

use crate::aggregator::fetcher::{FetchOutcome, SubscriptionFetcher};
use crate::sources::{InlineEntry, SubscriptionEndpoint};

/// Neither subscriptions nor inline entries produced anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("There is nothing to return")]
pub struct NothingToReturn;

/// Raw bytes of every successful subscription followed by the inline entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedPayload {
    bytes: Vec<u8>,
    /// Number of subscriptions that contributed.
    pub subscriptions: usize,
    /// Number of inline entries appended.
    pub inline: usize,
}

impl MergedPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Fetches every endpoint concurrently and merges the results.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn SubscriptionFetcher>,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn SubscriptionFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn merge(
        &self,
        endpoints: &[SubscriptionEndpoint],
        inline: &[InlineEntry],
        client_id: &str,
    ) -> Result<MergedPayload, NothingToReturn> {
        let outcomes = self.fetch_all(endpoints, client_id).await;
        merge_outcomes(outcomes, inline)
    }

    /// One task per endpoint. The result vector is indexed like `endpoints`.
    async fn fetch_all(&self, endpoints: &[SubscriptionEndpoint], client_id: &str) -> Vec<FetchOutcome> {
        let client_id: Arc<str> = Arc::from(client_id);

        let handles = endpoints.iter().cloned().map(|endpoint| {
            let fetcher = self.fetcher.clone();
            let client_id = client_id.clone();
            tokio::spawn(async move { fetcher.fetch(&endpoint, &client_id).await })
        });

        join_all(handles)
            .await
            .into_iter()
            .zip(endpoints)
            .map(|(joined, endpoint)| match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(endpoint = %endpoint, error = %e, "Subscription task failed");
                    None
                }
            })
            .collect()
    }
}

/// Apply the merge policy to fetch outcomes given in endpoint order.
///
/// Successful payloads are concatenated without separators, then the inline
/// entries are appended joined by `\n`. A `\n` is inserted before the inline
/// block only when the subscription block does not already end with one.
pub fn merge_outcomes(outcomes: Vec<FetchOutcome>, inline: &[InlineEntry]) -> Result<MergedPayload, NothingToReturn> {
    let payloads: Vec<Vec<u8>> = outcomes.into_iter().flatten().collect();

    if payloads.is_empty() {
        if inline.is_empty() {
            tracing::error!("No subscriptions or configurations available");
            return Err(NothingToReturn);
        }
        tracing::warn!("No subscriptions available");
    }

    let mut bytes = payloads.concat();
    if !inline.is_empty() && !bytes.is_empty() && !bytes.ends_with(b"\n") {
        bytes.push(b'\n');
    }
    for (i, entry) in inline.iter().enumerate() {
        if i > 0 {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(entry.as_bytes());
    }

    Ok(MergedPayload {
        bytes,
        subscriptions: payloads.len(),
        inline: inline.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::LineClassifier;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    fn inline(lines: &[&str]) -> Vec<InlineEntry> {
        LineClassifier::default().classify(lines.iter()).inline
    }

    fn endpoints(lines: &[&str]) -> Vec<SubscriptionEndpoint> {
        LineClassifier::default().classify(lines.iter()).endpoints
    }

    /// Answers from a table after an optional per-URL delay.
    struct TableFetcher {
        answers: HashMap<String, (u64, Option<&'static [u8]>)>,
    }

    #[async_trait]
    impl SubscriptionFetcher for TableFetcher {
        async fn fetch(&self, endpoint: &SubscriptionEndpoint, client_id: &str) -> FetchOutcome {
            let (delay_ms, body) = self.answers.get(&endpoint.url_for(client_id)).copied()?;
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            body.map(<[u8]>::to_vec)
        }
    }

    #[test]
    fn test_merge_order_and_separators() {
        let merged = merge_outcomes(
            vec![Some(b"A\n".to_vec()), None, Some(b"B".to_vec())],
            &inline(&["vless://one", "vless://two"]),
        )
        .unwrap();

        assert_eq!(merged.as_bytes(), b"A\nB\nvless://one\nvless://two");
        assert_eq!(merged.subscriptions, 2);
        assert_eq!(merged.inline, 2);
    }

    #[test]
    fn test_no_double_newline_before_inline() {
        let merged = merge_outcomes(vec![Some(b"ss://a\n".to_vec())], &inline(&["vless://b"])).unwrap();
        assert_eq!(merged.as_bytes(), b"ss://a\nvless://b");
    }

    #[test]
    fn test_inline_only() {
        let merged = merge_outcomes(vec![None, None], &inline(&["vless://a", "vless://b"])).unwrap();
        assert_eq!(merged.as_bytes(), b"vless://a\nvless://b");
        assert_eq!(merged.subscriptions, 0);
    }

    #[test]
    fn test_subscriptions_only() {
        let merged = merge_outcomes(vec![Some(b"X".to_vec())], &[]).unwrap();
        assert_eq!(merged.as_bytes(), b"X");
    }

    #[test]
    fn test_nothing_to_return() {
        assert_eq!(merge_outcomes(vec![None, None], &[]), Err(NothingToReturn));
        assert_eq!(merge_outcomes(vec![], &[]), Err(NothingToReturn));
    }

    #[tokio::test]
    async fn test_input_order_beats_completion_order() {
        let mut answers = HashMap::new();
        answers.insert("https://slow.example/id".to_string(), (200, Some(&b"SLOW"[..])));
        answers.insert("https://fast.example/id".to_string(), (0, Some(&b"FAST"[..])));
        answers.insert("https://dead.example/id".to_string(), (0, None));

        let aggregator = Aggregator::new(Arc::new(TableFetcher { answers }));
        let list = endpoints(&[
            "https://slow.example/",
            "https://dead.example/",
            "https://fast.example/",
        ]);

        let merged = aggregator.merge(&list, &[], "id").await.unwrap();
        assert_eq!(merged.as_bytes(), b"SLOWFAST");
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let mut answers = HashMap::new();
        for i in 0..5 {
            answers.insert(format!("https://s{}.example/", i), (300, Some(&b"x"[..])));
        }
        let aggregator = Aggregator::new(Arc::new(TableFetcher { answers }));
        let list = endpoints(&[
            "https://s0.example/",
            "https://s1.example/",
            "https://s2.example/",
            "https://s3.example/",
            "https://s4.example/",
        ]);

        let start = std::time::Instant::now();
        let merged = aggregator.merge(&list, &[], "").await.unwrap();
        assert_eq!(merged.as_bytes(), b"xxxxx");
        assert!(start.elapsed() < Duration::from_millis(1200));
    }
}
