//! Wallet token account record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Address;

/// A token account held by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    /// Token account address.
    pub address: Address,
    /// Owning wallet.
    pub owner: Address,
    /// Mint of the held token.
    pub mint: Address,
    /// Balance in native units.
    pub amount: Decimal,
}
