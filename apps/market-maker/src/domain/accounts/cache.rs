//! Group cache record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Address;

/// Deposit and borrow indices of a root bank.
///
/// Account balances are stored in index units; multiplying by the index
/// gives native token amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankIndices {
    /// Deposit index.
    pub deposit_index: Decimal,
    /// Borrow index.
    pub borrow_index: Decimal,
}

impl Default for BankIndices {
    fn default() -> Self {
        Self {
            deposit_index: Decimal::ONE,
            borrow_index: Decimal::ONE,
        }
    }
}

/// Cached per-slot data for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCache {
    /// Root bank indices.
    pub indices: BankIndices,
    /// Oracle price of the slot's base token in the shared quote.
    pub price: Decimal,
}

/// Group cache: bank indices and prices refreshed by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    /// Cache account address.
    pub address: Address,
    /// Root bank indices for the shared quote token.
    pub quote: BankIndices,
    /// Per-slot entries, indexed like group slots.
    pub slots: Vec<Option<SlotCache>>,
}

impl Cache {
    /// Entry for a slot, if cached.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&SlotCache> {
        self.slots.get(index).and_then(Option::as_ref)
    }
}
