//! Health Reporter Port (Driven Port)

/// Sink for per-facet health.
///
/// Reporting is fire-and-forget: implementations must not block and must
/// never fail the caller.
pub trait HealthReporter: Send + Sync {
    /// Start tracking a facet.
    fn register(&self, name: &str);

    /// Record a failure for a facet.
    fn report(&self, name: &str, error: &str);

    /// Record a successful update for a facet.
    fn record_update(&self, name: &str);
}

/// Health reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHealthReporter;

impl HealthReporter for NoOpHealthReporter {
    fn register(&self, _name: &str) {}

    fn report(&self, _name: &str, _error: &str) {}

    fn record_update(&self, _name: &str) {}
}
