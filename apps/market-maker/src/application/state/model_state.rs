//! The composite snapshot handed to the order pipeline.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::FacetReader;
use crate::domain::accounts::{Account, EventQueue, Group, Inventory};
use crate::domain::market::{Market, Price};
use crate::domain::orders::{Order, OrderBook, PlacedOrdersContainer};
use crate::domain::shared::Address;

/// Readers for every facet of a model state.
#[derive(Debug, Clone)]
pub struct FacetReaders {
    /// Group configuration.
    pub group: FacetReader<Group>,
    /// Margin account.
    pub account: FacetReader<Account>,
    /// Oracle price.
    pub price: FacetReader<Price>,
    /// Orders resting under the order owner.
    pub placed_orders: FacetReader<PlacedOrdersContainer>,
    /// Inventory.
    pub inventory: FacetReader<Inventory>,
    /// Market order book.
    pub order_book: FacetReader<OrderBook>,
    /// Market event queue.
    pub event_queue: FacetReader<EventQueue>,
}

/// Current view of everything the order pipeline needs for one market.
///
/// Each accessor returns the most recently published value of its facet.
/// Facets refresh independently, so two reads may observe different
/// instants.
#[derive(Debug, Clone)]
pub struct ModelState {
    order_owner: Address,
    market: Arc<Market>,
    facets: FacetReaders,
}

impl ModelState {
    /// Assemble a model state.
    #[must_use]
    pub const fn new(order_owner: Address, market: Arc<Market>, facets: FacetReaders) -> Self {
        Self {
            order_owner,
            market,
            facets,
        }
    }

    /// Owner of the orders this model state tracks.
    #[must_use]
    pub const fn order_owner(&self) -> Address {
        self.order_owner
    }

    /// The market.
    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Group configuration.
    #[must_use]
    pub fn group(&self) -> Arc<Group> {
        self.facets.group.latest()
    }

    /// Margin account.
    #[must_use]
    pub fn account(&self) -> Arc<Account> {
        self.facets.account.latest()
    }

    /// Oracle price.
    #[must_use]
    pub fn price(&self) -> Arc<Price> {
        self.facets.price.latest()
    }

    /// Orders resting under the order owner.
    #[must_use]
    pub fn placed_orders(&self) -> Arc<PlacedOrdersContainer> {
        self.facets.placed_orders.latest()
    }

    /// Inventory.
    #[must_use]
    pub fn inventory(&self) -> Arc<Inventory> {
        self.facets.inventory.latest()
    }

    /// Order book.
    #[must_use]
    pub fn order_book(&self) -> Arc<OrderBook> {
        self.facets.order_book.latest()
    }

    /// Event queue.
    #[must_use]
    pub fn event_queue(&self) -> Arc<EventQueue> {
        self.facets.event_queue.latest()
    }

    /// Best bid.
    #[must_use]
    pub fn top_bid(&self) -> Option<Order> {
        self.order_book().top_bid().cloned()
    }

    /// Best ask.
    #[must_use]
    pub fn top_ask(&self) -> Option<Order> {
        self.order_book().top_ask().cloned()
    }

    /// Book spread, if both sides have orders.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        self.order_book().spread()
    }

    /// Book orders owned by the order owner.
    #[must_use]
    pub fn existing_orders(&self) -> Vec<Order> {
        self.order_book().orders_owned_by(&self.order_owner)
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.order_book();
        write!(
            f,
            "« ModelState for market '{}' [owner {}]: price {} | {} | bids {} asks {} »",
            self.market.qualified_symbol(),
            self.order_owner,
            self.price().mid,
            self.inventory(),
            book.bids().len(),
            book.asks().len()
        )
    }
}
