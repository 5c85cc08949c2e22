//! Aligns prices and quantities to the market's tick and lot sizes.

use rust_decimal::Decimal;
use tracing::debug;

use super::{ChainContext, OrderChainElement};
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Rounds each order's price to the nearest tick and quantity to the nearest
/// lot. Orders whose quantity rounds to zero are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundToLotSizeElement;

impl RoundToLotSizeElement {
    /// Registered element name.
    pub const NAME: &'static str = "round_to_lot_size";
}

impl OrderChainElement for RoundToLotSizeElement {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process(
        &self,
        _context: &ChainContext,
        model_state: &ModelState,
        orders: Vec<Order>,
    ) -> Vec<Order> {
        let converter = model_state.market().lot_size_converter();
        orders
            .into_iter()
            .filter_map(|order| {
                let quantity = converter.round_quantity(order.quantity);
                if quantity == Decimal::ZERO {
                    debug!(%order, "Removing order with quantity below one lot");
                    return None;
                }
                let price = converter.round_price(order.price);
                Some(order.with_price(price).with_quantity(quantity))
            })
            .collect()
    }
}
