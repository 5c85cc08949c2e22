//! Prometheus Metrics Module
//!
//! Exposes market maker metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Facets**: Updates and failures per model state facet
//! - **Subscriptions**: Running push subscription tasks
//! - **Polling**: Poll cycle durations and outcomes
//! - **Reconciliation**: Orders kept, ignored, cancelled and placed
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the health server port. Recording
//! functions are no-ops until [`init_metrics`] installs a recorder.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Later calls return the handle installed by the first.
///
/// # Errors
///
/// Returns an error if the recorder cannot be installed, for example because
/// another global recorder is already set.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    // Facets
    describe_counter!(
        "market_maker_facet_updates_total",
        "Successful facet updates by facet"
    );
    describe_counter!(
        "market_maker_facet_errors_total",
        "Facet update failures by facet and error kind"
    );

    // Subscriptions
    describe_gauge!(
        "market_maker_active_subscriptions",
        "Number of running push subscription tasks"
    );

    // Polling
    describe_histogram!(
        "market_maker_poll_cycle_seconds",
        "Time to fetch and decode every facet in one poll cycle"
    );
    describe_counter!(
        "market_maker_poll_cycles_total",
        "Poll cycles by outcome"
    );

    // Reconciliation
    describe_counter!(
        "market_maker_reconciled_orders_total",
        "Orders per reconciliation action and strategy"
    );
    describe_counter!(
        "market_maker_reconcile_cycles_total",
        "Reconciliation runs by strategy"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Reconciliation action labels.
#[derive(Debug, Clone, Copy)]
enum Action {
    Keep,
    Ignore,
    Cancel,
    Place,
}

impl Action {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Ignore => "ignore",
            Self::Cancel => "cancel",
            Self::Place => "place",
        }
    }
}

/// Record a successful facet update.
pub fn record_facet_update(facet: &str) {
    counter!(
        "market_maker_facet_updates_total",
        "facet" => facet.to_string()
    )
    .increment(1);
}

/// Record a facet update failure.
pub fn record_facet_error(facet: &str, kind: &'static str) {
    counter!(
        "market_maker_facet_errors_total",
        "facet" => facet.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Count one more running subscription task.
pub fn subscription_started() {
    gauge!("market_maker_active_subscriptions").increment(1.0);
}

/// Count one fewer running subscription task.
pub fn subscription_stopped() {
    gauge!("market_maker_active_subscriptions").decrement(1.0);
}

/// Record a poll cycle's duration and whether it produced a model state.
pub fn record_poll_cycle(duration: Duration, ok: bool) {
    let outcome = if ok { "ok" } else { "failed" };
    histogram!("market_maker_poll_cycle_seconds").record(duration.as_secs_f64());
    counter!(
        "market_maker_poll_cycles_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one reconciliation run.
pub fn record_reconcile(
    strategy: &'static str,
    kept: usize,
    ignored: usize,
    cancelled: usize,
    placed: usize,
) {
    counter!(
        "market_maker_reconcile_cycles_total",
        "strategy" => strategy
    )
    .increment(1);

    for (action, count) in [
        (Action::Keep, kept),
        (Action::Ignore, ignored),
        (Action::Cancel, cancelled),
        (Action::Place, placed),
    ] {
        counter!(
            "market_maker_reconciled_orders_total",
            "strategy" => strategy,
            "action" => action.as_str()
        )
        .increment(count as u64);
    }
}

// =============================================================================
// Tests
// =============================================================================
