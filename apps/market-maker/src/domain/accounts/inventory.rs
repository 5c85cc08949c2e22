//! Inventory derived from account records.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Account, Cache, Group, GroupSlot, OpenOrders, TokenAccount};
use crate::domain::market::Market;
use crate::domain::shared::{DomainError, InstrumentValue};

/// Where inventory balances are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventorySource {
    /// Wallet token accounts (serum markets).
    SplTokens,
    /// A margin account (spot and perp markets).
    Account,
}

/// Balances available to the strategy for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Where the balances are held.
    pub source: InventorySource,
    /// Accrued liquidity incentives.
    pub incentives: InstrumentValue,
    /// Quote available as collateral for new orders.
    pub available_collateral: InstrumentValue,
    /// Base held, including amounts in open-orders accounts.
    pub base: InstrumentValue,
    /// Quote held, including amounts in open-orders accounts.
    pub quote: InstrumentValue,
}

impl Inventory {
    /// Inventory for a margin account.
    ///
    /// Spot and serum markets count the slot's base balance plus base held in
    /// the matching open-orders account. Perp markets count the perp base
    /// position. Quote is the account's net quote plus quote held in every
    /// open-orders account.
    ///
    /// # Errors
    ///
    /// Returns an error if the group lists no slot for the market.
    pub fn from_account(
        market: &Market,
        group: &Group,
        cache: &Cache,
        account: &Account,
        open_orders: &[OpenOrders],
    ) -> Result<Self, DomainError> {
        let info = market.info();
        let slot = slot_for_market(market, group)?;

        let base_native = match market {
            Market::Perp(_) => {
                let lots = account
                    .perp_account(slot.index)
                    .map_or(Decimal::ZERO, |perp| perp.base_position);
                info.base.instrument().shift_to_native(
                    info.lot_size_converter.base_lots_to_number(lots),
                )
            }
            Market::Serum(_) | Market::Spot(_) => {
                let in_open_orders: Decimal = open_orders
                    .iter()
                    .filter(|oo| Some(oo.market) == slot.spot_market)
                    .map(|oo| oo.base_token_total)
                    .sum();
                account.net_base_native(slot.index, cache) + in_open_orders
            }
        };

        let net_quote_native = account.net_quote_native(cache);
        let quote_in_open_orders: Decimal = open_orders.iter().map(|oo| oo.quote_token_total).sum();
        let quote_instrument = group.shared_quote.instrument().clone();

        Ok(Self {
            source: InventorySource::Account,
            incentives: InstrumentValue::from_native(
                group.incentive_token.instrument().clone(),
                account.incentives,
            ),
            available_collateral: InstrumentValue::from_native(
                quote_instrument.clone(),
                net_quote_native,
            ),
            base: InstrumentValue::from_native(info.base.instrument().clone(), base_native),
            quote: InstrumentValue::from_native(
                quote_instrument,
                net_quote_native + quote_in_open_orders,
            ),
        })
    }

    /// Inventory for wallet token accounts trading a serum market.
    #[must_use]
    pub fn from_token_accounts(
        market: &Market,
        group: &Group,
        base: &TokenAccount,
        quote: &TokenAccount,
        open_orders: Option<&OpenOrders>,
    ) -> Self {
        let info = market.info();
        let (oo_base, oo_quote) = open_orders.map_or((Decimal::ZERO, Decimal::ZERO), |oo| {
            (oo.base_token_total, oo.quote_token_total)
        });

        Self {
            source: InventorySource::SplTokens,
            incentives: InstrumentValue::zero(group.incentive_token.instrument().clone()),
            available_collateral: InstrumentValue::from_native(
                info.quote.instrument().clone(),
                quote.amount,
            ),
            base: InstrumentValue::from_native(
                info.base.instrument().clone(),
                base.amount + oo_base,
            ),
            quote: InstrumentValue::from_native(
                info.quote.instrument().clone(),
                quote.amount + oo_quote,
            ),
        }
    }
}

fn slot_for_market<'a>(market: &Market, group: &'a Group) -> Result<&'a GroupSlot, DomainError> {
    let address = market.address();
    let slot = match market {
        Market::Spot(_) => group.slot_by_spot_market(&address),
        Market::Perp(_) => group.slot_by_perp_market(&address),
        Market::Serum(info) => group.slot_by_symbol(info.base.symbol()),
    };
    slot.ok_or_else(|| DomainError::InvalidValue {
        field: "market".to_string(),
        message: format!("group has no slot for {}", market.qualified_symbol()),
    })
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "« Inventory {:?}: {} / {} (available {}, incentives {}) »",
            self.source,
            self.base.value,
            self.quote.value,
            self.available_collateral.value,
            self.incentives.value
        )
    }
}
