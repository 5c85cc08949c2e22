//! Tolerance-matching reconciler.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderReconciler, ReconciledOrders};
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// How far an existing order may be from a desired one and still count as
/// the same quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tolerance {
    /// Maximum absolute difference.
    Absolute(Decimal),
    /// Maximum difference as a fraction of the desired value.
    Relative(Decimal),
}

impl Tolerance {
    /// Whether `existing` is within tolerance of `desired`.
    #[must_use]
    pub fn allows(&self, existing: Decimal, desired: Decimal) -> bool {
        let difference = (existing - desired).abs();
        match self {
            Self::Absolute(limit) => difference <= *limit,
            Self::Relative(fraction) => difference <= desired.abs() * *fraction,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::Absolute(Decimal::ZERO)
    }
}

/// Keeps existing orders that are close enough to a desired order.
///
/// Existing orders are taken in order. Each is matched to an unmatched
/// desired order on the same side whose price and quantity are both within
/// tolerance, preferring the smallest price difference, then the smallest
/// quantity difference, then the earliest desired order. Matched pairs need
/// no action; everything else is cancelled or placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToleranceOrderReconciler {
    price_tolerance: Tolerance,
    quantity_tolerance: Tolerance,
}

impl ToleranceOrderReconciler {
    /// Create a reconciler.
    #[must_use]
    pub const fn new(price_tolerance: Tolerance, quantity_tolerance: Tolerance) -> Self {
        Self {
            price_tolerance,
            quantity_tolerance,
        }
    }

    fn best_match(&self, existing: &Order, desired: &[Order], taken: &[bool]) -> Option<usize> {
        desired
            .iter()
            .enumerate()
            .filter(|(index, candidate)| {
                !taken[*index]
                    && candidate.side == existing.side
                    && self.price_tolerance.allows(existing.price, candidate.price)
                    && self
                        .quantity_tolerance
                        .allows(existing.quantity, candidate.quantity)
            })
            .min_by_key(|(index, candidate)| {
                (
                    (existing.price - candidate.price).abs(),
                    (existing.quantity - candidate.quantity).abs(),
                    *index,
                )
            })
            .map(|(index, _)| index)
    }
}

impl OrderReconciler for ToleranceOrderReconciler {
    fn name(&self) -> &'static str {
        "tolerance"
    }

    fn reconcile(
        &self,
        _model_state: &ModelState,
        existing: Vec<Order>,
        desired: Vec<Order>,
    ) -> ReconciledOrders {
        let mut taken = vec![false; desired.len()];
        let mut to_keep = Vec::new();
        let mut to_cancel = Vec::new();

        for order in existing {
            match self.best_match(&order, &desired, &taken) {
                Some(index) => {
                    taken[index] = true;
                    to_keep.push(order);
                }
                None => to_cancel.push(order),
            }
        }

        let (to_ignore, to_place): (Vec<_>, Vec<_>) = desired
            .into_iter()
            .zip(taken)
            .partition(|(_, matched)| *matched);

        let cancelling_all = to_keep.is_empty() && !to_cancel.is_empty();
        ReconciledOrders {
            to_keep,
            to_ignore: to_ignore.into_iter().map(|(order, _)| order).collect(),
            to_cancel,
            to_place: to_place.into_iter().map(|(order, _)| order).collect(),
            cancelling_all,
        }
    }
}
