//! Health and metrics reporting shared by the builders.

use tracing::{trace, warn};

use crate::application::ports::HealthReporter;
use crate::application::state::StateError;
use crate::infrastructure::metrics;

/// Record a successful facet update.
pub(crate) fn facet_updated(health: &dyn HealthReporter, facet: &str) {
    trace!(facet, "Facet updated");
    health.record_update(facet);
    metrics::record_facet_update(facet);
}

/// Record a facet failure. The facet keeps its previous value.
pub(crate) fn facet_failed(health: &dyn HealthReporter, error: &StateError) {
    warn!(facet = error.facet(), error = %error, "Facet update failed, keeping last good value");
    health.report(error.facet(), &error.to_string());
    metrics::record_facet_error(error.facet(), error.kind());
}
