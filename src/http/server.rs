//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the two subscription routes
//! - Accept a trailing slash on either route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Run the subscription pipeline and shape its response
//! - Observability (metrics, correlation IDs)

use axum::{
    extract::{Path, Request, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Router, ServiceExt,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{Layer, ServiceBuilder};
use tower_http::{normalize_path::NormalizePathLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{subscription_response, ApiError, ProfileHeaders};
use crate::observability::metrics;
use crate::service::SubscriptionService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubscriptionService>,
    pub profile: Arc<ProfileHeaders>,
}

/// HTTP server for the subscription merger.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let service = SubscriptionService::from_config(&config)?;
        Ok(Self::with_service(config, service))
    }

    /// Create a server around an already wired pipeline.
    pub fn with_service(config: AppConfig, service: SubscriptionService) -> Self {
        let profile = ProfileHeaders::from_config(&config.profile);
        tracing::debug!(headers = profile.len(), "Profile headers prepared");

        let state = AppState {
            service: Arc::new(service),
            profile: Arc::new(profile),
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let prefix = &config.route.prefix;

        Router::new()
            .route(&format!("/{}", prefix), get(default_client_handler))
            .route(&format!("/{}/{{client_id}}", prefix), get(client_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        // Wraps the router so `/{prefix}/` is trimmed before route matching.
        let app = NormalizePathLayer::trim_trailing_slash().layer(self.router);

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn default_client_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    serve_subscription(&state, "", &headers).await
}

async fn client_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    serve_subscription(&state, &client_id, &headers).await
}

/// Main subscription handler.
/// Builds the merged payload for `client_id` and encodes it.
async fn serve_subscription(state: &AppState, client_id: &str, headers: &HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(headers);

    let response = match state.service.build(client_id).await {
        Ok(payload) => {
            tracing::info!(
                request_id = %request_id,
                subscriptions = payload.subscriptions,
                inline = payload.inline,
                bytes = payload.len(),
                "Subscription served"
            );
            subscription_response(&payload, &state.profile)
        }
        Err(e) => {
            let api_error = ApiError::from(&e);
            tracing::warn!(
                request_id = %request_id,
                status = %api_error.status(),
                error = %e,
                "Subscription request failed"
            );
            api_error.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}
