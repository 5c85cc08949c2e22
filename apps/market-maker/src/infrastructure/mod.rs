//! Infrastructure Layer - Configuration and operational adapters.
//!
//! Health tracking, metrics, telemetry and configuration loading. Exchange
//! transports and decoders are supplied by the embedding application through
//! the application ports.

/// YAML configuration with environment interpolation.
pub mod config;

/// Per-facet health tracking and the health HTTP endpoint.
pub mod health;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// OpenTelemetry tracing integration.
pub mod telemetry;
