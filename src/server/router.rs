use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use chrono::Duration;

use super::api::api_router;
use super::response::ApiError;
use crate::config::StoreConfig;
use crate::gateway::Gateway;
use crate::store::{self, Store};

pub struct AppState {
    store_config: StoreConfig,
    gateway: OnceLock<Option<Gateway>>,
    pub session_ttl: Duration,
}

impl AppState {
    /// State whose store is connected on first use from `store_config`.
    #[must_use]
    pub fn new(store_config: StoreConfig, session_ttl: Duration) -> Self {
        Self {
            store_config,
            gateway: OnceLock::new(),
            session_ttl,
        }
    }

    /// State over an already connected store.
    #[must_use]
    pub fn with_store(store: Arc<dyn Store>, session_ttl: Duration) -> Self {
        Self {
            store_config: StoreConfig::default(),
            gateway: OnceLock::from(Some(Gateway::new(store))),
            session_ttl,
        }
    }

    /// The gateway, or None when the store settings are absent or the
    /// connection failed. The outcome of the first attempt is kept for the
    /// process lifetime.
    pub fn gateway(&self) -> Option<&Gateway> {
        self.gateway
            .get_or_init(|| match store::connect(&self.store_config) {
                Ok(store) => Some(Gateway::new(store)),
                Err(e) => {
                    tracing::error!("Store unavailable: {e}");
                    None
                }
            })
            .as_ref()
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

/// Rejects every API request with 500 until a store is reachable, and hands
/// the gateway to handlers as a request extension.
async fn require_store(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(gateway) = state.gateway() else {
        return ApiError::store_not_configured().into_response();
    };
    request.extensions_mut().insert(gateway.clone());
    next.run(request).await
}

async fn invalid_endpoint() -> ApiError {
    ApiError::not_found("Invalid endpoint")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = api_router()
        .fallback(invalid_endpoint)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_store,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
