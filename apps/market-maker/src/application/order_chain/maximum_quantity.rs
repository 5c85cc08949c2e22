//! Lowers or removes orders above a maximum quantity.

use rust_decimal::Decimal;
use tracing::debug;

use super::element::Options;
use super::{ChainConfigError, ChainContext, ElementConfig, OrderChainElement};
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Orders above `maximum_quantity` are lowered to it, or removed when
/// `remove` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaximumQuantityElement {
    maximum_quantity: Decimal,
    remove: bool,
}

impl MaximumQuantityElement {
    /// Registered element name.
    pub const NAME: &'static str = "maximum_quantity";

    /// Create the element.
    #[must_use]
    pub const fn new(maximum_quantity: Decimal, remove: bool) -> Self {
        Self {
            maximum_quantity,
            remove,
        }
    }

    /// Build from configuration options `maximum_quantity` and `remove`.
    ///
    /// # Errors
    ///
    /// Returns an error if `maximum_quantity` is missing or invalid, or if an
    /// unknown option is given.
    pub fn from_config(config: &ElementConfig) -> Result<Self, ChainConfigError> {
        let options = Options::new(Self::NAME, &config.options);
        options.reject_unknown(&["maximum_quantity", "remove"])?;
        Ok(Self::new(
            options.non_negative_decimal("maximum_quantity")?,
            options.bool_or("remove", false)?,
        ))
    }
}

impl OrderChainElement for MaximumQuantityElement {
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
                if order.quantity <= self.maximum_quantity {
                    Some(order)
                } else if self.remove {
                    debug!(%order, maximum = %self.maximum_quantity, "Removing order above maximum quantity");
                    None
                } else {
                    Some(order.with_quantity(self.maximum_quantity))
                }
            })
            .collect()
    }
}
