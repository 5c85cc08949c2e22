//! Order book for a single market.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Order;
use crate::domain::shared::Address;

/// Both sides of one market's book.
///
/// Bids are held in descending price order and asks in ascending price
/// order, so the top of each side is its first element. Either side may be
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    symbol: String,
    bids: Vec<Order>,
    asks: Vec<Order>,
}

impl OrderBook {
    /// Create a book, sorting both sides.
    #[must_use]
    pub fn new(symbol: impl Into<String>, mut bids: Vec<Order>, mut asks: Vec<Order>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            symbol: symbol.into(),
            bids,
            asks,
        }
    }

    /// An empty book.
    #[must_use]
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new(), Vec::new())
    }

    /// Market symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bids, best first.
    #[must_use]
    pub fn bids(&self) -> &[Order] {
        &self.bids
    }

    /// Asks, best first.
    #[must_use]
    pub fn asks(&self) -> &[Order] {
        &self.asks
    }

    /// Best bid, if any.
    #[must_use]
    pub fn top_bid(&self) -> Option<&Order> {
        self.bids.first()
    }

    /// Best ask, if any.
    #[must_use]
    pub fn top_ask(&self) -> Option<&Order> {
        self.asks.first()
    }

    /// Difference between best ask and best bid.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.top_bid(), self.top_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Midpoint between best bid and best ask.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.top_bid(), self.top_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// All orders on either side owned by `owner`, bids first.
    #[must_use]
    pub fn orders_owned_by(&self, owner: &Address) -> Vec<Order> {
        self.bids
            .iter()
            .chain(&self.asks)
            .filter(|order| order.is_owned_by(owner))
            .cloned()
            .collect()
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "« OrderBook {}", self.symbol)?;
        for ask in self.asks.iter().rev() {
            writeln!(f, "    {:>14} {:>14}", ask.quantity, ask.price)?;
        }
        for bid in &self.bids {
            writeln!(f, "    {:>14} {:>14}", bid.price, bid.quantity)?;
        }
        write!(f, "»")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::orders::{OrderType, Side};

    fn order(side: Side, price: Decimal) -> Order {
        Order::from_values(side, price, dec!(1), OrderType::Limit)
    }

    #[test]
    fn sides_are_sorted_on_construction() {
        let book = OrderBook::new(
            "TEST/USDC",
            vec![order(Side::Buy, dec!(88)), order(Side::Buy, dec!(90)), order(Side::Buy, dec!(89))],
            vec![order(Side::Sell, dec!(112)), order(Side::Sell, dec!(110)), order(Side::Sell, dec!(111))],
        );

        let bids: Vec<_> = book.bids().iter().map(|o| o.price).collect();
        let asks: Vec<_> = book.asks().iter().map(|o| o.price).collect();
        assert_eq!(bids, vec![dec!(90), dec!(89), dec!(88)]);
        assert_eq!(asks, vec![dec!(110), dec!(111), dec!(112)]);
    }

    #[test]
    fn top_of_book_and_spread() {
        let book = OrderBook::new(
            "TEST/USDC",
            vec![order(Side::Buy, dec!(90))],
            vec![order(Side::Sell, dec!(110))],
        );
        assert_eq!(book.top_bid().map(|o| o.price), Some(dec!(90)));
        assert_eq!(book.top_ask().map(|o| o.price), Some(dec!(110)));
        assert_eq!(book.spread(), Some(dec!(20)));
        assert_eq!(book.mid_price(), Some(dec!(100)));
    }

    #[test]
    fn empty_sides_are_valid() {
        let book = OrderBook::empty("TEST/USDC");
        assert!(book.top_bid().is_none());
        assert!(book.top_ask().is_none());
        assert!(book.spread().is_none());
        assert!(book.mid_price().is_none());
    }

    #[test]
    fn owned_orders_are_filtered() {
        let me = Address::from_seed("me");
        let other = Address::from_seed("other");
        let book = OrderBook::new(
            "TEST/USDC",
            vec![
                Order::resting(1, 1, me, Side::Buy, dec!(90), dec!(1)),
                Order::resting(2, 2, other, Side::Buy, dec!(89), dec!(1)),
            ],
            vec![Order::resting(3, 3, me, Side::Sell, dec!(110), dec!(1))],
        );

        let mine = book.orders_owned_by(&me);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.is_owned_by(&me)));
    }
}
