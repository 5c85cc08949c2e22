//! Order Reconciliation
//!
//! Diffs the orders resting on the book against the chain-adjusted desired
//! orders into keep / ignore / cancel / place sets.

mod reconciled;
mod strategies;
mod tolerance;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use reconciled::ReconciledOrders;
pub use strategies::{AlwaysReplaceOrderReconciler, NullOrderReconciler};
pub use tolerance::{Tolerance, ToleranceOrderReconciler};

use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Decides which existing orders to keep and which desired orders to place.
///
/// Implementations are pure. The result always splits `existing` into
/// `to_keep` and `to_cancel`, and `desired` into `to_ignore` and `to_place`.
pub trait OrderReconciler: Send + Sync + fmt::Debug {
    /// Strategy name, used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Reconcile existing orders against desired orders.
    fn reconcile(
        &self,
        model_state: &ModelState,
        existing: Vec<Order>,
        desired: Vec<Order>,
    ) -> ReconciledOrders;
}

/// Reconciler selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ReconcilerSettings {
    /// Never act.
    Null,
    /// Replace everything every cycle.
    #[default]
    AlwaysReplace,
    /// Keep orders within tolerance.
    Tolerance {
        /// Price tolerance.
        #[serde(default)]
        price_tolerance: Tolerance,
        /// Quantity tolerance.
        #[serde(default)]
        quantity_tolerance: Tolerance,
    },
}

impl ReconcilerSettings {
    /// Build the selected reconciler.
    #[must_use]
    pub fn build(&self) -> Box<dyn OrderReconciler> {
        match *self {
            Self::Null => Box::new(NullOrderReconciler),
            Self::AlwaysReplace => Box::new(AlwaysReplaceOrderReconciler),
            Self::Tolerance {
                price_tolerance,
                quantity_tolerance,
            } => Box::new(ToleranceOrderReconciler::new(
                price_tolerance,
                quantity_tolerance,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_build_named_reconcilers() {
        assert_eq!(ReconcilerSettings::Null.build().name(), "null");
        assert_eq!(ReconcilerSettings::default().build().name(), "always_replace");
        let tolerance = ReconcilerSettings::Tolerance {
            price_tolerance: Tolerance::default(),
            quantity_tolerance: Tolerance::default(),
        };
        assert_eq!(tolerance.build().name(), "tolerance");
    }

    #[test]
    fn settings_deserialize_from_tagged_json() {
        let settings: ReconcilerSettings = serde_json::from_str(
            r#"{"strategy": "tolerance", "price_tolerance": {"relative": "0.001"}}"#,
        )
        .unwrap();
        assert!(matches!(
            settings,
            ReconcilerSettings::Tolerance {
                price_tolerance: Tolerance::Relative(_),
                quantity_tolerance: Tolerance::Absolute(_),
            }
        ));
    }
}
