//! Orders resting under one owner for one market.

use serde::{Deserialize, Serialize};

use super::Side;
use crate::domain::accounts::OpenOrders;

/// Identity of a resting order as recorded in an owner's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedOrder {
    /// Exchange-assigned id.
    pub id: u128,
    /// Client-assigned id.
    pub client_id: u64,
    /// Buy or sell.
    pub side: Side,
}

/// Perp orders held inside a margin account for a single perp market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpOpenOrders {
    /// Orders for the market, in account slot order.
    pub placed_orders: Vec<PlacedOrder>,
}

/// Resting orders, by market kind.
///
/// Spot-style markets keep orders in a dedicated open-orders account;
/// perpetual markets keep them in the margin account itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacedOrdersContainer {
    /// Serum or spot open-orders account.
    Spot(OpenOrders),
    /// Perp orders from the margin account.
    Perp(PerpOpenOrders),
}

impl PlacedOrdersContainer {
    /// The orders currently resting.
    #[must_use]
    pub fn placed_orders(&self) -> &[PlacedOrder] {
        match self {
            Self::Spot(open_orders) => &open_orders.placed_orders,
            Self::Perp(perp) => &perp.placed_orders,
        }
    }

    /// Whether an order with the given client id is resting.
    #[must_use]
    pub fn contains_client_id(&self, client_id: u64) -> bool {
        self.placed_orders()
            .iter()
            .any(|placed| placed.client_id == client_id)
    }
}
