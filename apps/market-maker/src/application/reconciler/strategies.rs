//! Baseline reconcilers.

use super::{OrderReconciler, ReconciledOrders};
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Leaves the book untouched: keeps every existing order and ignores every
/// desired one. For observe-only operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullOrderReconciler;

impl OrderReconciler for NullOrderReconciler {
    fn name(&self) -> &'static str {
        "null"
    }

    fn reconcile(
        &self,
        _model_state: &ModelState,
        existing: Vec<Order>,
        desired: Vec<Order>,
    ) -> ReconciledOrders {
        ReconciledOrders {
            to_keep: existing,
            to_ignore: desired,
            to_cancel: Vec::new(),
            to_place: Vec::new(),
            cancelling_all: false,
        }
    }
}

/// Cancels every existing order and places every desired one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysReplaceOrderReconciler;

impl OrderReconciler for AlwaysReplaceOrderReconciler {
    fn name(&self) -> &'static str {
        "always_replace"
    }

    fn reconcile(
        &self,
        _model_state: &ModelState,
        existing: Vec<Order>,
        desired: Vec<Order>,
    ) -> ReconciledOrders {
        ReconciledOrders {
            to_keep: Vec::new(),
            to_ignore: Vec::new(),
            to_cancel: existing,
            to_place: desired,
            cancelling_all: true,
        }
    }
}
