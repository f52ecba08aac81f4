#![forbid(unsafe_code)]
//! HTTP surface of AssetPrism: router, shared state, request-id plumbing,
//! request metrics, and the CORS middleware. The binary entry point in
//! `main.rs` wires env config into [`AppState`] and serves [`build_router`].

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::sync::Mutex;

use assetprism_store::Database;

pub mod config;
pub mod http;

pub use config::ApiConfig;

pub const CRATE_NAME: &str = "assetprism-server";

#[derive(Default)]
pub(crate) struct RequestMetrics {
    pub(crate) counts: Mutex<HashMap<(String, u16), u64>>,
    pub(crate) latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_insert_with(Vec::new)
            .push(latency.as_nanos() as u64);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub api: ApiConfig,
    pub(crate) metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_config(db, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(db: Arc<Database>, api: ApiConfig) -> Self {
        Self {
            db,
            api,
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

fn origin_allowed(state: &AppState, origin: &str) -> bool {
    state
        .api
        .cors_allowed_origins
        .iter()
        .any(|x| x == "*" || x == origin)
}

async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if req.method() == axum::http::Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(origin_value) = origin {
            if origin_allowed(&state, &origin_value) {
                if let Ok(v) = HeaderValue::from_str(&origin_value) {
                    resp.headers_mut().insert("access-control-allow-origin", v);
                }
                resp.headers_mut().insert(
                    "access-control-allow-methods",
                    HeaderValue::from_static("GET,POST,OPTIONS"),
                );
                resp.headers_mut().insert(
                    "access-control-allow-headers",
                    HeaderValue::from_static("content-type,x-request-id"),
                );
            }
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(origin_value) = origin {
        if origin_allowed(&state, &origin_value) {
            if let Ok(v) = HeaderValue::from_str(&origin_value) {
                resp.headers_mut().insert("access-control-allow-origin", v);
            }
            resp.headers_mut()
                .insert("vary", HeaderValue::from_static("Origin"));
        }
    }
    resp
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/health", get(http::handlers::health_handler))
        .route("/metrics", get(http::metrics::metrics_handler))
        .route(
            "/api/v1/hardware-assets",
            get(http::assets::list_assets_handler).post(http::assets::create_asset_handler),
        )
        .route(
            "/api/v1/hardware-assets/{id}",
            get(http::assets::asset_detail_handler),
        )
        .route("/api/v1/users", get(http::reference::users_handler))
        .route("/api/v1/locations", get(http::reference::locations_handler))
        .route(
            "/api/v1/manufacturers",
            get(http::reference::manufacturers_handler),
        )
        .route(
            "/api/v1/asset-categories",
            get(http::reference::asset_categories_handler),
        )
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

#[cfg(test)]
mod metrics_tests {
    use super::RequestMetrics;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[tokio::test]
    async fn observe_request_counts_per_route_and_status() {
        let metrics = RequestMetrics::default();
        metrics
            .observe_request("/health", StatusCode::OK, Duration::from_millis(1))
            .await;
        metrics
            .observe_request("/health", StatusCode::OK, Duration::from_millis(2))
            .await;
        metrics
            .observe_request(
                "/api/v1/hardware-assets",
                StatusCode::BAD_REQUEST,
                Duration::from_millis(3),
            )
            .await;

        let counts = metrics.counts.lock().await;
        assert_eq!(counts[&("/health".to_string(), 200)], 2);
        assert_eq!(
            counts[&("/api/v1/hardware-assets".to_string(), 400)],
            1
        );
        drop(counts);
        let latency = metrics.latency_ns.lock().await;
        assert_eq!(latency["/health"].len(), 2);
    }
}
