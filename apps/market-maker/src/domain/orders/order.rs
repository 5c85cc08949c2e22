//! Order value object.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderType, Side};
use crate::domain::shared::Address;

/// An order, either resting on the exchange or desired by a strategy.
///
/// Orders are immutable values. Transformations return new orders through
/// the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Exchange-assigned id (zero if not yet placed).
    pub id: u128,
    /// Client-assigned id.
    pub client_id: u64,
    /// Owner of the order (open-orders account or margin account).
    pub owner: Option<Address>,
    /// Buy or sell.
    pub side: Side,
    /// Limit price.
    pub price: Decimal,
    /// Quantity in base units.
    pub quantity: Decimal,
    /// Execution behaviour.
    pub order_type: OrderType,
}

impl Order {
    /// Create a desired order with a random client id.
    #[must_use]
    pub fn from_values(
        side: Side,
        price: Decimal,
        quantity: Decimal,
        order_type: OrderType,
    ) -> Self {
        Self {
            id: 0,
            client_id: rand::random::<u64>(),
            owner: None,
            side,
            price,
            quantity,
            order_type,
        }
    }

    /// Create a resting order as decoded from the exchange.
    #[must_use]
    pub const fn resting(
        id: u128,
        client_id: u64,
        owner: Address,
        side: Side,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            id,
            client_id,
            owner: Some(owner),
            side,
            price,
            quantity,
            order_type: OrderType::Unknown,
        }
    }

    /// Copy of this order with a new price.
    #[must_use]
    pub fn with_price(&self, price: Decimal) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    /// Copy of this order with a new quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: Decimal) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Copy of this order with a new order type.
    #[must_use]
    pub fn with_order_type(&self, order_type: OrderType) -> Self {
        Self {
            order_type,
            ..self.clone()
        }
    }

    /// Copy of this order with a new client id.
    #[must_use]
    pub fn with_client_id(&self, client_id: u64) -> Self {
        Self {
            client_id,
            ..self.clone()
        }
    }

    /// Whether the order is owned by `owner`.
    #[must_use]
    pub fn is_owned_by(&self, owner: &Address) -> bool {
        self.owner.as_ref() == Some(owner)
    }

    /// Price (in lots) encoded in a serum-style order id.
    ///
    /// The high 64 bits of the 128-bit id carry the price, the low 64 bits a
    /// sequence number.
    #[must_use]
    pub const fn price_lots_from_id(id: u128) -> u64 {
        (id >> 64) as u64
    }

    /// Build a serum-style order id from a price (in lots) and sequence number.
    #[must_use]
    pub const fn id_from_price_lots(price_lots: u64, sequence: u64) -> u128 {
        ((price_lots as u128) << 64) | sequence as u128
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "« Order {} for {} at {} [ID: {} / {}] {} »",
            self.side, self.quantity, self.price, self.id, self.client_id, self.order_type
        )
    }
}
