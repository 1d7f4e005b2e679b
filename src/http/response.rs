//! Response construction.
//!
//! # Responsibilities
//! - Encode the merged payload as the text/plain body
//! - Attach the optional profile headers
//! - Map pipeline errors to HTTP status codes
//!
//! # Design Decisions
//! - Header values are validated once at startup; unusable ones are dropped
//! - Unset headers are omitted, never sent empty
//! - Error bodies are `{"detail": "..."}`

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::aggregator::MergedPayload;
use crate::codec;
use crate::config::ProfileConfig;
use crate::service::ServiceError;

pub const PROFILE_TITLE: &str = "profile-title";
pub const SUPPORT_URL: &str = "support-url";
pub const PROFILE_WEB_PAGE_URL: &str = "profile-web-page-url";
pub const ANNOUNCE: &str = "announce";
pub const PROFILE_UPDATE_INTERVAL: &str = "profile-update-interval";
pub const PROVIDER_ID: &str = "providerid";

/// Optional descriptive headers sent with every successful response.
#[derive(Debug, Clone, Default)]
pub struct ProfileHeaders {
    headers: HeaderMap,
}

impl ProfileHeaders {
    pub fn from_config(profile: &ProfileConfig) -> Self {
        let pairs = [
            (PROFILE_TITLE, &profile.title),
            (SUPPORT_URL, &profile.support_url),
            (PROFILE_WEB_PAGE_URL, &profile.web_page_url),
            (ANNOUNCE, &profile.announce),
            (PROFILE_UPDATE_INTERVAL, &profile.update_interval),
            (PROVIDER_ID, &profile.provider_id),
        ];

        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            // from_bytes keeps UTF-8 titles, which from_str would reject.
            match HeaderValue::from_bytes(value.as_bytes()) {
                Ok(v) => {
                    headers.insert(HeaderName::from_static(name), v);
                }
                Err(_) => tracing::warn!(header = name, "Ignoring profile header with invalid value"),
            }
        }

        Self { headers }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Build the 200 response for a merged payload.
pub fn subscription_response(payload: &MergedPayload, profile: &ProfileHeaders) -> Response {
    let body = codec::encode_payload(payload.as_bytes());

    let mut headers = profile.headers().clone();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    (StatusCode::OK, headers, body).into_response()
}

/// Pipeline error as seen by HTTP clients.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<&ServiceError> for ApiError {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::Source(_) => Self {
                status: StatusCode::NOT_FOUND,
                detail: "Config file not found",
            },
            ServiceError::Merge(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: "There is nothing to return",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
