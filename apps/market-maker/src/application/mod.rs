//! Application Layer - State aggregation and the order pipeline.
//!
//! This layer defines the ports the core reads from, builds model states
//! from them, and turns a strategy's desired orders into reconciled actions.

/// Port interfaces for data sources, decoders, locators and health.
pub mod ports;

/// Facet cells, state sources and the composite model state.
pub mod state;

/// Push and poll model state builders and their factory.
pub mod builder;

/// Configurable order transformations.
pub mod order_chain;

/// Reconciliation of desired against existing orders.
pub mod reconciler;

/// Order chain followed by reconciliation.
pub mod pipeline;
