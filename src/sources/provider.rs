//! Source list retrieval.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use thiserror::Error;

use crate::config::{SourceListConfig, SourceMode};

/// Accept header asking GitHub for the raw file contents.
const GITHUB_RAW: &str = "application/vnd.github.v3.raw";

/// The source list could not be obtained.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source list {}: {source}", path.display())]
    Local {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch source list from {url}: {source}")]
    Remote {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Supplies the current source-list lines. One attempt per call.
#[async_trait]
pub trait SourceListProvider: Send + Sync {
    async fn fetch(&self) -> Result<Vec<String>, SourceError>;
}

/// Reads the source list from a local document.
#[derive(Debug, Clone)]
pub struct LocalFileProvider {
    path: PathBuf,
}

impl LocalFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceListProvider for LocalFileProvider {
    async fn fetch(&self) -> Result<Vec<String>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Local {
                path: self.path.clone(),
                source,
            })?;
        Ok(text.lines().map(String::from).collect())
    }
}

/// Downloads the source list, optionally with a bearer token.
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    client: Client,
    url: String,
    token: Option<String>,
    timeout: Duration,
}

impl RemoteProvider {
    pub fn new(client: Client, url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            token,
            timeout,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_RAW));
                }
                Err(_) => tracing::warn!("Source list token is not a valid header value, sending without it"),
            }
        }
        headers
    }

    async fn download(&self) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.url)
            .headers(self.headers())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl SourceListProvider for RemoteProvider {
    async fn fetch(&self) -> Result<Vec<String>, SourceError> {
        let text = self.download().await.map_err(|source| SourceError::Remote {
            url: self.url.clone(),
            source,
        })?;
        Ok(text.lines().map(String::from).collect())
    }
}

/// Build the provider selected by the configuration.
pub fn from_config(config: &SourceListConfig, client: Client) -> Arc<dyn SourceListProvider> {
    match config.mode {
        SourceMode::Local => Arc::new(LocalFileProvider::new(config.local_path.clone())),
        SourceMode::Remote => Arc::new(RemoteProvider::new(
            client,
            config.url.clone(),
            config.token.clone(),
            config.timeout(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_local_provider_reads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "https://a.example/\r\nvless://x@y:1\n\n").unwrap();

        let lines = LocalFileProvider::new(file.path()).fetch().await.unwrap();
        assert_eq!(lines, vec!["https://a.example/", "vless://x@y:1", ""]);
    }

    #[tokio::test]
    async fn test_local_provider_missing_file() {
        let provider = LocalFileProvider::new("/definitely/not/here/configs.txt");
        let err = provider.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Local { .. }));
    }

    #[test]
    fn test_token_headers() {
        let provider = RemoteProvider::new(
            Client::new(),
            "https://example.com/list",
            Some("ghp_abc".into()),
            Duration::from_secs(1),
        );
        let headers = provider.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ghp_abc");
        assert_eq!(headers.get(ACCEPT).unwrap(), GITHUB_RAW);

        let anonymous = RemoteProvider::new(Client::new(), "https://example.com/list", None, Duration::from_secs(1));
        assert!(anonymous.headers().is_empty());
    }
}
