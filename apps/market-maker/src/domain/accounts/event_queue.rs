//! Market event queue record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::orders::Side;
use crate::domain::shared::Address;

/// What happened to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// The order traded.
    Fill,
    /// The order left the book without trading.
    Out,
}

/// One queued event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    /// Fill or out.
    pub kind: EventKind,
    /// Side of the affected order.
    pub side: Side,
    /// Owner of the affected order.
    pub owner: Address,
    /// Exchange order id.
    pub order_id: u128,
    /// Client order id.
    pub client_id: u64,
    /// Fill price (zero for out events).
    pub price: Decimal,
    /// Quantity filled or removed.
    pub quantity: Decimal,
}

/// Events not yet consumed by the exchange's cranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQueue {
    /// Event queue address.
    pub address: Address,
    /// Total number of events ever pushed.
    pub sequence_number: u64,
    /// Unconsumed events, oldest first.
    pub events: Vec<QueueEvent>,
}

impl EventQueue {
    /// Empty queue.
    #[must_use]
    pub const fn empty(address: Address) -> Self {
        Self {
            address,
            sequence_number: 0,
            events: Vec::new(),
        }
    }

    /// Fills involving orders owned by `owner`.
    pub fn fills_for(&self, owner: Address) -> impl Iterator<Item = &QueueEvent> {
        self.events
            .iter()
            .filter(move |event| event.kind == EventKind::Fill && event.owner == owner)
    }
}
