//! Health Check and Metrics Endpoint
//!
//! Per-facet health tracking plus the HTTP endpoint that exposes it and the
//! Prometheus metrics. Used by container orchestrators, supervisors and
//! monitoring systems.
//!
//! # Endpoints
//!
//! - `GET /health` - Returns JSON health status per facet
//! - `GET /healthz` - Kubernetes liveness probe (simple OK)
//! - `GET /readyz` - Kubernetes readiness probe (every facet has a value)
//! - `GET /metrics` - Prometheus metrics in text format

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::ports::HealthReporter;
use crate::infrastructure::metrics::get_metrics_handle;

// =============================================================================
// Facet Health Tracking
// =============================================================================

/// Health of one facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetState {
    /// Registered, no update or failure yet.
    Pending,
    /// Most recent event was a successful update.
    Healthy,
    /// Most recent event was a failure.
    Failing,
}

/// Tracking record for one facet.
#[derive(Debug, Clone, Serialize)]
pub struct FacetHealth {
    /// Current state.
    pub state: FacetState,
    /// Successful updates.
    pub updates: u64,
    /// Failures.
    pub errors: u64,
    /// Time of the last successful update.
    pub last_update: Option<DateTime<Utc>>,
    /// Most recent failure message.
    pub last_error: Option<String>,
}

impl FacetHealth {
    const fn pending() -> Self {
        Self {
            state: FacetState::Pending,
            updates: 0,
            errors: 0,
            last_update: None,
            last_error: None,
        }
    }
}

/// Central per-facet health record.
///
/// Implements [`HealthReporter`], so builders report into it directly.
/// Reporting only takes a short write lock and never fails.
#[derive(Debug, Default)]
pub struct HealthCheck {
    facets: RwLock<BTreeMap<String, FacetHealth>>,
}

impl HealthCheck {
    /// Create an empty health check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every facet's health.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, FacetHealth> {
        self.facets.read().clone()
    }

    /// Health of one facet.
    #[must_use]
    pub fn facet(&self, name: &str) -> Option<FacetHealth> {
        self.facets.read().get(name).cloned()
    }

    fn with_facet(&self, name: &str, update: impl FnOnce(&mut FacetHealth)) {
        let mut facets = self.facets.write();
        let health = facets
            .entry(name.to_string())
            .or_insert_with(FacetHealth::pending);
        update(health);
    }
}

impl HealthReporter for HealthCheck {
    fn register(&self, name: &str) {
        self.with_facet(name, |_| {});
    }

    fn report(&self, name: &str, error: &str) {
        self.with_facet(name, |health| {
            health.state = FacetState::Failing;
            health.errors += 1;
            health.last_error = Some(error.to_string());
        });
    }

    fn record_update(&self, name: &str) {
        self.with_facet(name, |health| {
            health.state = FacetState::Healthy;
            health.updates += 1;
            health.last_update = Some(Utc::now());
        });
    }
}

// =============================================================================
// Health Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy", "degraded", or "unhealthy".
    pub status: HealthStatus,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Per-facet health.
    pub facets: BTreeMap<String, FacetHealth>,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every facet healthy.
    Healthy,
    /// Some facets pending or failing.
    Degraded,
    /// No facet healthy.
    Unhealthy,
}

// =============================================================================
// Health Server State
// =============================================================================

/// Shared state for the health server.
pub struct HealthServerState {
    version: String,
    started_at: Instant,
    health: Arc<HealthCheck>,
}

impl HealthServerState {
    /// Create new health server state.
    #[must_use]
    pub fn new(version: String, health: Arc<HealthCheck>) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            health,
        }
    }
}

// =============================================================================
// Health Server
// =============================================================================

/// Health check HTTP server.
pub struct HealthServer {
    port: u16,
    state: Arc<HealthServerState>,
    cancel: CancellationToken,
}

impl HealthServer {
    /// Create a new health server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<HealthServerState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the health server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `HealthServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), HealthServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HealthServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Health server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| HealthServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Health server stopped");
        Ok(())
    }
}

fn router(state: Arc<HealthServerState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn health_handler(State(state): State<Arc<HealthServerState>>) -> impl IntoResponse {
    let response = build_health_response(&state);
    let status_code = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness_handler(State(state): State<Arc<HealthServerState>>) -> impl IntoResponse {
    if is_ready(&state.health.snapshot()) {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            let body = handle.render();
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                body,
            )
        },
    )
}

fn build_health_response(state: &HealthServerState) -> HealthResponse {
    let facets = state.health.snapshot();
    HealthResponse {
        status: determine_health_status(&facets),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        facets,
    }
}

fn determine_health_status(facets: &BTreeMap<String, FacetHealth>) -> HealthStatus {
    let healthy = facets
        .values()
        .filter(|facet| facet.state == FacetState::Healthy)
        .count();

    match healthy {
        0 => HealthStatus::Unhealthy,
        n if n == facets.len() => HealthStatus::Healthy,
        _ => HealthStatus::Degraded,
    }
}

/// Ready once at least one facet is tracked and every tracked facet has
/// produced a value.
fn is_ready(facets: &BTreeMap<String, FacetHealth>) -> bool {
    !facets.is_empty() && facets.values().all(|facet| facet.updates > 0)
}

// =============================================================================
// Errors
// =============================================================================

/// Health server errors.
#[derive(Debug, thiserror::Error)]
pub enum HealthServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&FacetState::Failing).unwrap(),
            "\"failing\""
        );
    }

    #[test]
    fn facet_transitions() {
        let health = HealthCheck::new();
        health.register("price");
        assert_eq!(health.facet("price").unwrap().state, FacetState::Pending);

        health.record_update("price");
        health.report("price", "facet 'price' timed out after 5s");
        let price = health.facet("price").unwrap();
        assert_eq!(price.state, FacetState::Failing);
        assert_eq!(price.updates, 1);
        assert_eq!(price.errors, 1);
        assert!(price.last_error.unwrap().contains("timed out"));

        health.record_update("price");
        assert_eq!(health.facet("price").unwrap().state, FacetState::Healthy);
    }

    #[test]
    fn register_keeps_existing_record() {
        let health = HealthCheck::new();
        health.record_update("group");
        health.register("group");
        assert_eq!(health.facet("group").unwrap().updates, 1);
    }

    #[test]
    fn status_from_facets() {
        let health = HealthCheck::new();
        assert_eq!(determine_health_status(&health.snapshot()), HealthStatus::Unhealthy);

        health.record_update("group");
        health.record_update("account");
        assert_eq!(determine_health_status(&health.snapshot()), HealthStatus::Healthy);

        health.report("account", "decode failed");
        assert_eq!(determine_health_status(&health.snapshot()), HealthStatus::Degraded);
    }

    #[test]
    fn readiness_requires_every_facet() {
        let health = HealthCheck::new();
        assert!(!is_ready(&health.snapshot()));

        health.register("group");
        health.record_update("account");
        assert!(!is_ready(&health.snapshot()));

        health.record_update("group");
        assert!(is_ready(&health.snapshot()));
    }

    #[test]
    fn response_includes_facets() {
        let health = Arc::new(HealthCheck::new());
        health.record_update("order_book");
        let state = HealthServerState::new("0.1.0".to_string(), Arc::clone(&health));

        let response = build_health_response(&state);
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.version, "0.1.0");
        assert!(response.facets.contains_key("order_book"));
    }
}
