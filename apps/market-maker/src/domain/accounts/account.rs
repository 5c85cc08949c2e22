//! Margin account record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BankIndices, Cache};
use crate::domain::orders::{PerpOpenOrders, PlacedOrder};
use crate::domain::shared::Address;

/// Deposits and borrows of one token, in bank index units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Deposited amount in deposit-index units.
    pub deposit: Decimal,
    /// Borrowed amount in borrow-index units.
    pub borrow: Decimal,
}

impl Balance {
    /// Net native amount given the bank's current indices.
    #[must_use]
    pub fn net_native(&self, indices: &BankIndices) -> Decimal {
        self.deposit * indices.deposit_index - self.borrow * indices.borrow_index
    }
}

/// Position and orders in one perp market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpAccount {
    /// Base position in base lots (negative when short).
    pub base_position: Decimal,
    /// Quote position in native quote.
    pub quote_position: Decimal,
    /// Base lots locked in resting bids.
    pub bids_quantity: Decimal,
    /// Base lots locked in resting asks.
    pub asks_quantity: Decimal,
    /// Orders resting in the market.
    pub placed_orders: Vec<PlacedOrder>,
}

impl PerpAccount {
    /// Resting orders in container form.
    #[must_use]
    pub fn open_orders(&self) -> PerpOpenOrders {
        PerpOpenOrders {
            placed_orders: self.placed_orders.clone(),
        }
    }
}

/// One slot of an account, indexed like the group slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSlot {
    /// Base token balance.
    pub balance: Balance,
    /// Open-orders account for the slot's spot market.
    pub spot_open_orders: Option<Address>,
    /// Perp position for the slot's perp market.
    pub perp_account: Option<PerpAccount>,
}

/// A margin account within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account address.
    pub address: Address,
    /// Owning wallet.
    pub owner: Address,
    /// Group the account belongs to.
    pub group: Address,
    /// Shared quote token balance.
    pub quote: Balance,
    /// Base slots.
    pub slots: Vec<AccountSlot>,
    /// Accrued liquidity incentives, in native units of the incentive token.
    pub incentives: Decimal,
}

impl Account {
    /// Slot at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&AccountSlot> {
        self.slots.get(index)
    }

    /// Open-orders address for the spot market at slot `index`.
    #[must_use]
    pub fn spot_open_orders_by_index(&self, index: usize) -> Option<Address> {
        self.slot(index).and_then(|slot| slot.spot_open_orders)
    }

    /// All spot open-orders addresses, in slot order.
    #[must_use]
    pub fn spot_open_orders(&self) -> Vec<Address> {
        self.slots
            .iter()
            .filter_map(|slot| slot.spot_open_orders)
            .collect()
    }

    /// Perp account at slot `index`.
    #[must_use]
    pub fn perp_account(&self, index: usize) -> Option<&PerpAccount> {
        self.slot(index).and_then(|slot| slot.perp_account.as_ref())
    }

    /// Net native quote given the cache's quote indices.
    #[must_use]
    pub fn net_quote_native(&self, cache: &Cache) -> Decimal {
        self.quote.net_native(&cache.quote)
    }

    /// Net native base for slot `index`, zero if either side is missing.
    #[must_use]
    pub fn net_base_native(&self, index: usize, cache: &Cache) -> Decimal {
        match (self.slot(index), cache.slot(index)) {
            (Some(slot), Some(cached)) => slot.balance.net_native(&cached.indices),
            _ => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::accounts::SlotCache;
    use crate::domain::orders::Side;

    fn cache() -> Cache {
        Cache {
            address: Address::from_seed("cache"),
            quote: BankIndices {
                deposit_index: dec!(1.1),
                borrow_index: dec!(1.2),
            },
            slots: vec![
                None,
                Some(SlotCache {
                    indices: BankIndices {
                        deposit_index: dec!(2),
                        borrow_index: dec!(3),
                    },
                    price: dec!(100),
                }),
            ],
        }
    }

    fn account() -> Account {
        Account {
            address: Address::from_seed("account"),
            owner: Address::from_seed("wallet"),
            group: Address::from_seed("group"),
            quote: Balance {
                deposit: dec!(100),
                borrow: dec!(10),
            },
            slots: vec![
                AccountSlot::default(),
                AccountSlot {
                    balance: Balance {
                        deposit: dec!(5),
                        borrow: dec!(1),
                    },
                    spot_open_orders: Some(Address::from_seed("oo")),
                    perp_account: Some(PerpAccount {
                        placed_orders: vec![PlacedOrder {
                            id: 9,
                            client_id: 99,
                            side: Side::Sell,
                        }],
                        ..PerpAccount::default()
                    }),
                },
            ],
            incentives: Decimal::ZERO,
        }
    }

    #[test]
    fn net_balances_apply_indices() {
        let account = account();
        let cache = cache();
        assert_eq!(account.net_quote_native(&cache), dec!(98));
        assert_eq!(account.net_base_native(1, &cache), dec!(7));
        assert_eq!(account.net_base_native(0, &cache), Decimal::ZERO);
    }

    #[test]
    fn slot_lookups() {
        let account = account();
        assert_eq!(account.spot_open_orders_by_index(1), Some(Address::from_seed("oo")));
        assert_eq!(account.spot_open_orders_by_index(0), None);
        assert_eq!(account.spot_open_orders(), vec![Address::from_seed("oo")]);
        let perp = account.perp_account(1).unwrap();
        assert_eq!(perp.open_orders().placed_orders.len(), 1);
    }
}
