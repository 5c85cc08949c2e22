#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Market Maker - Control Core
//!
//! Keeps a live, composite view of one market (prices, books, balances,
//! resting orders) and turns a strategy's desired orders into the minimal
//! set of cancels and places.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Exchange records and order types
//!   - `shared`: Addresses, tokens, instrument values, errors
//!   - `market`: Market kinds, lot size conversion, oracle prices
//!   - `orders`: Orders, order books, placed orders
//!   - `accounts`: Group, cache, margin and open-orders accounts, inventory
//!
//! - **Application**: State aggregation and the order pipeline
//!   - `ports`: Data sources, decoders, locators, health reporting
//!   - `state`: Facet cells, push and pull sources, `ModelState`
//!   - `builder`: Push and poll model state builders and their factory
//!   - `order_chain`: Configurable order transformations
//!   - `reconciler`: Keep / ignore / cancel / place decisions
//!   - `pipeline`: Chain followed by reconciliation
//!
//! - **Infrastructure**: Operational adapters
//!   - `config`: YAML configuration with env interpolation
//!   - `health`: Per-facet health and the HTTP endpoint
//!   - `metrics`: Prometheus instrumentation
//!   - `telemetry`: Tracing and OpenTelemetry export
//!
//! # Data Flow
//!
//! ```text
//! AccountDataPort ──┐   ┌──────────────┐   ┌────────────┐   ┌────────────┐
//!                   ├──►│ ModelState   │──►│ OrderChain │──►│ Reconciler │──► ReconciledOrders
//! PriceOraclePort ──┘   │ Builder      │   └────────────┘   └────────────┘
//!                       └──────┬───────┘
//!                              └──► HealthCheck ──► /health, /readyz
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Exchange records and order types with no I/O.
pub mod domain;

/// Application layer - State aggregation and the order pipeline.
pub mod application;

/// Infrastructure layer - Configuration, health, metrics and telemetry.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::market::{Market, MarketInfo, MarketKind, Price};
pub use domain::orders::{Order, OrderBook, OrderType, PlacedOrdersContainer, Side};
pub use domain::shared::{Address, DecodeError, DomainError, Token};

// State aggregation
pub use application::builder::{
    BuilderContext, BuilderError, BuilderTarget, Deadlines, ModelStateBuilder, ModelUpdateMode,
    model_state_builder_factory,
};
pub use application::state::{ModelState, StateError};

// Order pipeline
pub use application::order_chain::{ChainContext, ElementConfig, OrderChain};
pub use application::pipeline::OrderPipeline;
pub use application::reconciler::{ReconciledOrders, ReconcilerSettings};

// Infrastructure config
pub use infrastructure::config::{ConfigError, CoreConfig, load_config, load_config_from_string};

// Health server
pub use infrastructure::health::{HealthCheck, HealthServer, HealthServerError, HealthServerState};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
