//! Group configuration record.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Address, Token};

/// One base-token slot of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSlot {
    /// Slot index, shared with cache and account slots.
    pub index: usize,
    /// Base token for the slot.
    pub base: Token,
    /// Spot market trading the base against the shared quote, if listed.
    pub spot_market: Option<Address>,
    /// Perp market for the base, if listed.
    pub perp_market: Option<Address>,
}

/// Group configuration: the shared quote token and the listed base tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group account address.
    pub address: Address,
    /// Quote token shared by every slot.
    pub shared_quote: Token,
    /// Base token slots.
    pub slots: Vec<GroupSlot>,
    /// Token in which liquidity incentives accrue.
    pub incentive_token: Token,
    /// Address of the group's cache account.
    pub cache: Address,
}

impl Group {
    /// Slot listing the given spot market.
    #[must_use]
    pub fn slot_by_spot_market(&self, market: &Address) -> Option<&GroupSlot> {
        self.slots
            .iter()
            .find(|slot| slot.spot_market.as_ref() == Some(market))
    }

    /// Slot listing the given perp market.
    #[must_use]
    pub fn slot_by_perp_market(&self, market: &Address) -> Option<&GroupSlot> {
        self.slots
            .iter()
            .find(|slot| slot.perp_market.as_ref() == Some(market))
    }

    /// Slot for a base token symbol (case-insensitive).
    #[must_use]
    pub fn slot_by_symbol(&self, symbol: &str) -> Option<&GroupSlot> {
        self.slots
            .iter()
            .find(|slot| slot.base.instrument().has_symbol(symbol))
    }
}
