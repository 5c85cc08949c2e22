//! Raises or removes orders below a minimum quantity.

use rust_decimal::Decimal;
use tracing::debug;

use super::element::Options;
use super::{ChainConfigError, ChainContext, ElementConfig, OrderChainElement};
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Orders below `minimum_quantity` are raised to it, or removed when
/// `remove` is set. Orders at or above it pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimumQuantityElement {
    minimum_quantity: Decimal,
    remove: bool,
}

impl MinimumQuantityElement {
    /// Registered element name.
    pub const NAME: &'static str = "minimum_quantity";

    /// Create the element.
    #[must_use]
    pub const fn new(minimum_quantity: Decimal, remove: bool) -> Self {
        Self {
            minimum_quantity,
            remove,
        }
    }

    /// Build from configuration options `minimum_quantity` and `remove`.
    ///
    /// # Errors
    ///
    /// Returns an error if `minimum_quantity` is missing or invalid, or if an
    /// unknown option is given.
    pub fn from_config(config: &ElementConfig) -> Result<Self, ChainConfigError> {
        let options = Options::new(Self::NAME, &config.options);
        options.reject_unknown(&["minimum_quantity", "remove"])?;
        Ok(Self::new(
            options.non_negative_decimal("minimum_quantity")?,
            options.bool_or("remove", false)?,
        ))
    }
}

impl OrderChainElement for MinimumQuantityElement {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process(
        &self,
        _context: &ChainContext,
        _model_state: &ModelState,
        orders: Vec<Order>,
    ) -> Vec<Order> {
        orders
            .into_iter()
            .filter_map(|order| {
                if order.quantity >= self.minimum_quantity {
                    return Some(order);
                }
                if self.remove {
                    debug!(%order, minimum = %self.minimum_quantity, "Removing order below minimum quantity");
                    return None;
                }
                debug!(%order, minimum = %self.minimum_quantity, "Raising order to minimum quantity");
                Some(order.with_quantity(self.minimum_quantity))
            })
            .collect()
    }
}
