//! Keeps post-only orders from crossing the book.

use tracing::debug;

use super::{ChainContext, OrderChainElement};
use crate::application::state::ModelState;
use crate::domain::orders::{Order, OrderType, Side};

/// Reprices post-only orders that would cross the book to one tick inside
/// the opposing top of book.
///
/// A post-only buy at or above the best ask moves to ask minus one tick; a
/// post-only sell at or below the best bid moves to bid plus one tick. Only
/// `POST_ONLY` orders are touched: `POST_ONLY_SLIDE` orders are repriced by
/// the exchange itself. Orders facing an empty side are unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreventPostOnlyCrossingBookElement;

impl PreventPostOnlyCrossingBookElement {
    /// Registered element name.
    pub const NAME: &'static str = "prevent_post_only_crossing_book";

    fn reprice(order: Order, model_state: &ModelState) -> Order {
        if order.order_type != OrderType::PostOnly {
            return order;
        }

        let tick = model_state.market().lot_size_converter().tick_size();
        let repriced = match order.side {
            Side::Buy => model_state
                .top_ask()
                .filter(|ask| order.price >= ask.price)
                .map(|ask| ask.price - tick),
            Side::Sell => model_state
                .top_bid()
                .filter(|bid| order.price <= bid.price)
                .map(|bid| bid.price + tick),
        };

        match repriced {
            Some(price) => {
                debug!(%order, new_price = %price, "Post-only order would cross the book, repricing");
                order.with_price(price)
            }
            None => order,
        }
    }
}

impl OrderChainElement for PreventPostOnlyCrossingBookElement {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process(
        &self,
        _context: &ChainContext,
        model_state: &ModelState,
        orders: Vec<Order>,
    ) -> Vec<Order> {
        orders
            .into_iter()
            .map(|order| Self::reprice(order, model_state))
            .collect()
    }
}
