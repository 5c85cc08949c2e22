//! Open-orders account record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::orders::{PlacedOrder, Side};
use crate::domain::shared::Address;

/// An open-orders account: funds locked in, or settled from, one market.
///
/// Balances are in native units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrders {
    /// Open-orders account address.
    pub address: Address,
    /// Market the account trades.
    pub market: Address,
    /// Owning wallet or margin account.
    pub owner: Address,
    /// Base not locked in orders.
    pub base_token_free: Decimal,
    /// All base held, locked or free.
    pub base_token_total: Decimal,
    /// Quote not locked in orders.
    pub quote_token_free: Decimal,
    /// All quote held, locked or free.
    pub quote_token_total: Decimal,
    /// Referrer rebates accrued, in native quote.
    pub referrer_rebate_accrued: Decimal,
    /// Orders resting on the book.
    pub placed_orders: Vec<PlacedOrder>,
}

impl OpenOrders {
    /// Empty open-orders account.
    #[must_use]
    pub const fn empty(address: Address, market: Address, owner: Address) -> Self {
        Self {
            address,
            market,
            owner,
            base_token_free: Decimal::ZERO,
            base_token_total: Decimal::ZERO,
            quote_token_free: Decimal::ZERO,
            quote_token_total: Decimal::ZERO,
            referrer_rebate_accrued: Decimal::ZERO,
            placed_orders: Vec::new(),
        }
    }

    /// Whether any order is resting.
    #[must_use]
    pub fn has_placed_orders(&self) -> bool {
        !self.placed_orders.is_empty()
    }

    /// Orders resting on the given side.
    pub fn placed_on(&self, side: Side) -> impl Iterator<Item = &PlacedOrder> {
        self.placed_orders.iter().filter(move |placed| placed.side == side)
    }
}
