//! The result of a reconciliation.

use std::fmt;

use crate::domain::orders::Order;

/// What to do with existing and desired orders this cycle.
///
/// `to_keep` and `to_cancel` split the existing orders; `to_ignore` and
/// `to_place` split the desired orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledOrders {
    /// Existing orders left alone.
    pub to_keep: Vec<Order>,
    /// Desired orders already represented by a kept order.
    pub to_ignore: Vec<Order>,
    /// Existing orders to cancel.
    pub to_cancel: Vec<Order>,
    /// Desired orders to place.
    pub to_place: Vec<Order>,
    /// Whether this cycle clears every existing order.
    pub cancelling_all: bool,
}

impl ReconciledOrders {
    /// Whether no cancel or place is needed.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.to_cancel.is_empty() && self.to_place.is_empty()
    }

    /// Number of exchange actions (cancels plus places).
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.to_cancel.len() + self.to_place.len()
    }
}

impl fmt::Display for ReconciledOrders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "« ReconciledOrders [cancelling all: {}]", self.cancelling_all)?;
        for (label, orders) in [
            ("Keep", &self.to_keep),
            ("Ignore", &self.to_ignore),
            ("Cancel", &self.to_cancel),
            ("Place", &self.to_place),
        ] {
            if orders.is_empty() {
                writeln!(f, "    {label}: None")?;
            } else {
                writeln!(f, "    {label}:")?;
                for order in orders {
                    writeln!(f, "        {order}")?;
                }
            }
        }
        write!(f, "»")
    }
}
