//! Conversion between exchange lots and decimal numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

const MAX_DECIMALS: u32 = 28;

/// Converts prices and quantities between exchange lots and decimals.
///
/// Exchanges express prices as quote lots per base lot and quantities as a
/// count of base lots. One price lot is the tick size, one base lot is the
/// lot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSizeConverter {
    base_decimals: u32,
    base_lot_size: Decimal,
    quote_decimals: u32,
    quote_lot_size: Decimal,
}

impl LotSizeConverter {
    /// Create a converter.
    ///
    /// # Errors
    ///
    /// Returns an error if a lot size is not positive or a decimal count is
    /// out of range.
    pub fn new(
        base_decimals: u32,
        base_lot_size: Decimal,
        quote_decimals: u32,
        quote_lot_size: Decimal,
    ) -> Result<Self, DomainError> {
        for (field, decimals) in [("base_decimals", base_decimals), ("quote_decimals", quote_decimals)] {
            if decimals > MAX_DECIMALS {
                return Err(DomainError::InvalidValue {
                    field: field.to_string(),
                    message: format!("{decimals} exceeds maximum of {MAX_DECIMALS}"),
                });
            }
        }
        for (field, lot) in [("base_lot_size", base_lot_size), ("quote_lot_size", quote_lot_size)] {
            if lot <= Decimal::ZERO {
                return Err(DomainError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be positive, got {lot}"),
                });
            }
        }
        Ok(Self {
            base_decimals,
            base_lot_size,
            quote_decimals,
            quote_lot_size,
        })
    }

    /// Converter where one lot is one unit (no decimals, lot size 1).
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            base_decimals: 0,
            base_lot_size: Decimal::ONE,
            quote_decimals: 0,
            quote_lot_size: Decimal::ONE,
        }
    }

    /// Base token decimals.
    #[must_use]
    pub const fn base_decimals(&self) -> u32 {
        self.base_decimals
    }

    /// Quote token decimals.
    #[must_use]
    pub const fn quote_decimals(&self) -> u32 {
        self.quote_decimals
    }

    /// Native base units per base lot.
    #[must_use]
    pub const fn base_lot_size(&self) -> Decimal {
        self.base_lot_size
    }

    /// Native quote units per quote lot.
    #[must_use]
    pub const fn quote_lot_size(&self) -> Decimal {
        self.quote_lot_size
    }

    /// Price of `lots` price lots.
    #[must_use]
    pub fn price_lots_to_number(&self, lots: Decimal) -> Decimal {
        let native = lots * self.quote_lot_size / self.base_lot_size;
        rescale(native, self.base_decimals, self.quote_decimals)
    }

    /// Price lots for a decimal price (not rounded).
    #[must_use]
    pub fn price_number_to_lots(&self, price: Decimal) -> Decimal {
        let native = rescale(price, self.quote_decimals, self.base_decimals);
        native * self.base_lot_size / self.quote_lot_size
    }

    /// Quantity of `lots` base lots.
    #[must_use]
    pub fn base_lots_to_number(&self, lots: Decimal) -> Decimal {
        rescale(lots * self.base_lot_size, 0, self.base_decimals)
    }

    /// Base lots for a decimal quantity (not rounded).
    #[must_use]
    pub fn base_number_to_lots(&self, quantity: Decimal) -> Decimal {
        rescale(quantity, self.base_decimals, 0) / self.base_lot_size
    }

    /// Amount of `lots` quote lots.
    #[must_use]
    pub fn quote_lots_to_number(&self, lots: Decimal) -> Decimal {
        rescale(lots * self.quote_lot_size, 0, self.quote_decimals)
    }

    /// Smallest price increment.
    #[must_use]
    pub fn tick_size(&self) -> Decimal {
        self.price_lots_to_number(Decimal::ONE)
    }

    /// Smallest quantity increment.
    #[must_use]
    pub fn lot_size(&self) -> Decimal {
        self.base_lots_to_number(Decimal::ONE)
    }

    /// Round a price to the nearest tick.
    #[must_use]
    pub fn round_price(&self, price: Decimal) -> Decimal {
        round_to(price, self.tick_size())
    }

    /// Round a quantity to the nearest lot.
    #[must_use]
    pub fn round_quantity(&self, quantity: Decimal) -> Decimal {
        round_to(quantity, self.lot_size())
    }
}

/// Multiply by 10^`up` and divide by 10^`down`.
fn rescale(value: Decimal, up: u32, down: u32) -> Decimal {
    value / Decimal::new(1, up) * Decimal::new(1, down)
}

fn round_to(value: Decimal, increment: Decimal) -> Decimal {
    if increment.is_zero() {
        return value;
    }
    ((value / increment).round() * increment).normalize()
}
