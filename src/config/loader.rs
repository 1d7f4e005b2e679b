//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AppConfig, SourceMode};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the service configuration.
///
/// Starts from the defaults (or the TOML file when given), loads `.env` if
/// present, overlays the process environment and validates the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = load_unvalidated(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Same layering as [`load_config`], minus validation. For offline tooling.
pub fn load_unvalidated(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(p) => read_config_file(p)?,
        None => AppConfig::default(),
    };

    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "Loaded .env file");
    }
    apply_env(&mut config, std::env::vars());
    Ok(config)
}

/// Overlay environment-style variables onto `config`.
///
/// Values are trimmed and blank values are treated as unset.
pub fn apply_env<I, K, V>(config: &mut AppConfig, vars: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut sub_name = None;

    for (key, value) in vars {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        let owned = || Some(value.to_string());

        match key.as_ref() {
            "LOCAL_MODE" => {
                config.source_list.mode = if value == "on" {
                    SourceMode::Local
                } else {
                    SourceMode::Remote
                };
            }
            "LOCAL_CONFIG_PATH" => config.source_list.local_path = PathBuf::from(value),
            "CONFIG_URL" => config.source_list.url = value.to_string(),
            "GITHUB_TOKEN" => config.source_list.token = owned(),
            "URL" => config.route.prefix = value.to_string(),
            "BIND_ADDRESS" => config.listener.bind_address = value.to_string(),
            "INLINE_PREFIXES" => {
                config.subscriptions.inline_prefixes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
            }
            "PROFILE_TITLE" => config.profile.title = owned(),
            "SUB_NAME" => sub_name = owned(),
            "SUPPORT_URL" => config.profile.support_url = owned(),
            "PROFILE_WEB_PAGE_URL" => config.profile.web_page_url = owned(),
            "ANNOUNCE" => config.profile.announce = owned(),
            "PROFILE_UPDATE_INTERVAL" => config.profile.update_interval = owned(),
            "PROVIDER_ID" => config.profile.provider_id = owned(),
            _ => {}
        }
    }

    // SUB_NAME is only a fallback for the title.
    if config.profile.title.is_none() {
        config.profile.title = sub_name;
    }
}
