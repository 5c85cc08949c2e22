//! Model state fixtures for unit tests.

#![allow(missing_docs)]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use super::{FacetReader, FacetReaders, ModelState};
use crate::domain::accounts::{
    Account, Balance, EventQueue, Group, Inventory, InventorySource, OpenOrders,
};
use crate::domain::market::{LotSizeConverter, Market, MarketInfo, OracleSource, Price};
use crate::domain::orders::{Order, OrderBook, PlacedOrdersContainer, Side};
use crate::domain::shared::{Address, InstrumentValue, Token};

pub fn token(symbol: &str) -> Token {
    Token::new(symbol, symbol, 6, Address::from_seed(symbol)).unwrap()
}

pub fn market(tick_size: Decimal) -> Market {
    Market::Spot(MarketInfo {
        symbol: "TEST/USDC".to_string(),
        address: Address::from_seed("market"),
        base: token("TEST"),
        quote: token("USDC"),
        lot_size_converter: LotSizeConverter::new(0, Decimal::ONE, 0, tick_size).unwrap(),
        bids: Address::from_seed("bids"),
        asks: Address::from_seed("asks"),
        event_queue: Address::from_seed("event_queue"),
    })
}

pub fn owner() -> Address {
    Address::from_seed("order_owner")
}

pub fn book_order(side: Side, price: Decimal, quantity: Decimal, owner: Address) -> Order {
    Order::resting(0, 0, owner, side, price, quantity)
}

/// Model state with the given book prices and tick size.
pub fn model_state(bids: &[Decimal], asks: &[Decimal], tick_size: Decimal) -> ModelState {
    let other = Address::from_seed("someone_else");
    let bids = bids
        .iter()
        .map(|price| book_order(Side::Buy, *price, Decimal::ONE, other))
        .collect();
    let asks = asks
        .iter()
        .map(|price| book_order(Side::Sell, *price, Decimal::ONE, other))
        .collect();
    model_state_with_book(OrderBook::new("TEST/USDC", bids, asks), tick_size)
}

/// Model state around a prepared order book.
pub fn model_state_with_book(book: OrderBook, tick_size: Decimal) -> ModelState {
    let market = market(tick_size);
    let quote = token("USDC");
    let group = Group {
        address: Address::from_seed("group"),
        shared_quote: quote.clone(),
        slots: Vec::new(),
        incentive_token: token("MNGO"),
        cache: Address::from_seed("cache"),
    };
    let account = Account {
        address: Address::from_seed("account"),
        owner: Address::from_seed("wallet"),
        group: group.address,
        quote: Balance::default(),
        slots: Vec::new(),
        incentives: Decimal::ZERO,
    };
    let price = Price {
        source: OracleSource::new("fixture", "Fixture", Vec::new()),
        timestamp: Utc::now(),
        symbol: "TEST/USDC".to_string(),
        bid: Decimal::ONE_HUNDRED,
        mid: Decimal::ONE_HUNDRED,
        ask: Decimal::ONE_HUNDRED,
        confidence: Decimal::ZERO,
    };
    let inventory = Inventory {
        source: InventorySource::Account,
        incentives: InstrumentValue::zero(token("MNGO").instrument().clone()),
        available_collateral: InstrumentValue::zero(quote.instrument().clone()),
        base: InstrumentValue::zero(token("TEST").instrument().clone()),
        quote: InstrumentValue::zero(quote.instrument().clone()),
    };
    let placed = PlacedOrdersContainer::Spot(OpenOrders::empty(
        owner(),
        market.address(),
        account.address,
    ));

    let facets = FacetReaders {
        group: FacetReader::fixed("group", Arc::new(group)),
        account: FacetReader::fixed("account", Arc::new(account)),
        price: FacetReader::fixed("price", Arc::new(price)),
        placed_orders: FacetReader::fixed("placed_orders", Arc::new(placed)),
        inventory: FacetReader::fixed("inventory", Arc::new(inventory)),
        order_book: FacetReader::fixed("order_book", Arc::new(book)),
        event_queue: FacetReader::fixed(
            "event_queue",
            Arc::new(EventQueue::empty(Address::from_seed("event_queue"))),
        ),
    };
    ModelState::new(owner(), Arc::new(market), facets)
}
