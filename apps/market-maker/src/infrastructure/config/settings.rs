//! Market Maker Configuration Settings
//!
//! Configuration types for the control core, loaded from YAML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::builder::{Deadlines, ModelUpdateMode};
use crate::application::order_chain::ElementConfig;
use crate::application::reconciler::ReconcilerSettings;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Model state construction.
    #[serde(default)]
    pub model_state: ModelStateSettings,
    /// Health server.
    #[serde(default)]
    pub health: HealthSettings,
    /// Reconciler selection and tolerances.
    #[serde(default)]
    pub reconciler: ReconcilerSettings,
    /// Order chain elements, applied in order.
    #[serde(default)]
    pub order_chain: Vec<ElementConfig>,
}

/// How model states are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStateSettings {
    /// Push subscriptions or polling.
    #[serde(default)]
    pub update_mode: ModelUpdateMode,
    /// Deadline for one fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Deadline for establishing one subscription, in milliseconds.
    #[serde(default = "default_subscribe_timeout_ms")]
    pub subscribe_timeout_ms: u64,
}

const fn default_fetch_timeout_ms() -> u64 {
    5_000
}

const fn default_subscribe_timeout_ms() -> u64 {
    10_000
}

impl Default for ModelStateSettings {
    fn default() -> Self {
        Self {
            update_mode: ModelUpdateMode::default(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            subscribe_timeout_ms: default_subscribe_timeout_ms(),
        }
    }
}

impl ModelStateSettings {
    /// Deadlines for the builders.
    #[must_use]
    pub const fn deadlines(&self) -> Deadlines {
        Deadlines {
            fetch: Duration::from_millis(self.fetch_timeout_ms),
            subscribe: Duration::from_millis(self.subscribe_timeout_ms),
        }
    }
}

/// Health server settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSettings {
    /// Port for `/health`, `/healthz`, `/readyz` and `/metrics`.
    #[serde(default = "default_health_port")]
    pub port: u16,
}

const fn default_health_port() -> u16 {
    8082
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            port: default_health_port(),
        }
    }
}
