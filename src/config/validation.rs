//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the route prefix is a single literal path segment
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{AppConfig, SourceMode};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route prefix is empty (set URL)")]
    EmptyPrefix,

    #[error("route prefix {0:?} must be a single path segment without '/', '{{', '}}' or '*'")]
    InvalidPrefix(String),

    #[error("remote source list requires a URL (set CONFIG_URL)")]
    MissingSourceUrl,

    #[error("source list URL {0:?} is not a valid http(s) URL")]
    InvalidSourceUrl(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("subscription timeout ({subscription_ms}ms) must be shorter than source list timeout ({source_list_ms}ms)")]
    TimeoutOrder {
        subscription_ms: u64,
        source_list_ms: u64,
    },

    #[error("at least one inline prefix is required")]
    NoInlinePrefixes,

    #[error("inline prefix {0:?} is empty or collides with subscription endpoints")]
    InvalidInlinePrefix(String),

    #[error("unknown log format {0:?} (expected \"compact\" or \"json\")")]
    UnknownLogFormat(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = config.route.prefix.as_str();
    if prefix.is_empty() {
        errors.push(ValidationError::EmptyPrefix);
    } else if prefix.contains(['/', '{', '}', '*']) {
        errors.push(ValidationError::InvalidPrefix(prefix.to_string()));
    }

    let source = &config.source_list;
    if source.mode == SourceMode::Remote {
        if source.url.is_empty() {
            errors.push(ValidationError::MissingSourceUrl);
        } else {
            match url::Url::parse(&source.url) {
                Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
                _ => errors.push(ValidationError::InvalidSourceUrl(source.url.clone())),
            }
        }
    }

    if source.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("source_list.timeout_ms"));
    }
    if config.subscriptions.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("subscriptions.timeout_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.subscriptions.timeout_ms >= source.timeout_ms {
        errors.push(ValidationError::TimeoutOrder {
            subscription_ms: config.subscriptions.timeout_ms,
            source_list_ms: source.timeout_ms,
        });
    }

    let prefixes = &config.subscriptions.inline_prefixes;
    if prefixes.is_empty() {
        errors.push(ValidationError::NoInlinePrefixes);
    }
    for p in prefixes {
        if p.is_empty() || p.starts_with("http") {
            errors.push(ValidationError::InvalidInlinePrefix(p.clone()));
        }
    }

    match config.observability.log_format.as_str() {
        "compact" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.route.prefix = "s3cr3t".into();
        config.source_list.url = "https://example.com/configs.txt".into();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.route.prefix = String::new();
        config.source_list.url = String::new();
        config.observability.log_format = "pretty".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyPrefix));
        assert!(errors.contains(&ValidationError::MissingSourceUrl));
    }

    #[test]
    fn test_prefix_must_be_one_segment() {
        let mut config = valid();
        config.route.prefix = "a/b".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidPrefix("a/b".into())]);
    }

    #[test]
    fn test_local_mode_needs_no_url() {
        let mut config = valid();
        config.source_list.mode = SourceMode::Local;
        config.source_list.url = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_timeout_order() {
        let mut config = valid();
        config.subscriptions.timeout_ms = 6000;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::TimeoutOrder { .. }));
    }

    #[test]
    fn test_inline_prefix_cannot_shadow_http() {
        let mut config = valid();
        config.subscriptions.inline_prefixes = vec!["https://".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidInlinePrefix("https://".into())]
        );
    }
}
