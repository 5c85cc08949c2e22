//! Ordered composition of chain elements.

use tracing::{debug, instrument};

use super::element::Options;
use super::{
    ChainConfigError, ChainContext, ElementConfig, MaximumQuantityElement, MinimumQuantityElement,
    OrderChainElement, PreventPostOnlyCrossingBookElement, RoundToLotSizeElement,
};
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Elements applied in sequence, each one's output feeding the next.
#[derive(Debug, Default)]
pub struct OrderChain {
    elements: Vec<Box<dyn OrderChainElement>>,
}

impl OrderChain {
    /// Chain over the given elements, in order.
    #[must_use]
    pub fn new(elements: Vec<Box<dyn OrderChainElement>>) -> Self {
        Self { elements }
    }

    /// Build a chain from configuration.
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` for an unregistered name, or an option error
    /// naming the element and option.
    pub fn from_config(configs: &[ElementConfig]) -> Result<Self, ChainConfigError> {
        let elements = configs
            .iter()
            .map(build_element)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(elements))
    }

    /// Append an element.
    #[must_use]
    pub fn with(mut self, element: impl OrderChainElement + 'static) -> Self {
        self.elements.push(Box::new(element));
        self
    }

    /// Element names, in order.
    #[must_use]
    pub fn element_names(&self) -> Vec<&'static str> {
        self.elements.iter().map(|element| element.name()).collect()
    }

    /// Whether the chain has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Run every element over `orders`.
    #[instrument(skip_all, fields(strategy = %context.strategy, cycle = context.cycle))]
    pub fn process(
        &self,
        context: &ChainContext,
        model_state: &ModelState,
        orders: Vec<Order>,
    ) -> Vec<Order> {
        self.elements.iter().fold(orders, |orders, element| {
            let before = orders.len();
            let processed = element.process(context, model_state, orders);
            debug!(
                element = element.name(),
                before,
                after = processed.len(),
                "Order chain element applied"
            );
            processed
        })
    }
}

/// Normalise a configured name: lowercase, separators removed, optional
/// `Element` suffix dropped.
fn normalise(name: &str) -> String {
    let compact: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    compact
        .strip_suffix("element")
        .map_or_else(|| compact.clone(), str::to_string)
}

fn build_element(config: &ElementConfig) -> Result<Box<dyn OrderChainElement>, ChainConfigError> {
    let element: Box<dyn OrderChainElement> = match normalise(&config.name).as_str() {
        "minimumquantity" => Box::new(MinimumQuantityElement::from_config(config)?),
        "maximumquantity" => Box::new(MaximumQuantityElement::from_config(config)?),
        "preventpostonlycrossingbook" => {
            no_options(PreventPostOnlyCrossingBookElement::NAME, config)?;
            Box::new(PreventPostOnlyCrossingBookElement)
        }
        "roundtolotsize" => {
            no_options(RoundToLotSizeElement::NAME, config)?;
            Box::new(RoundToLotSizeElement)
        }
        _ => {
            return Err(ChainConfigError::UnknownElement {
                name: config.name.clone(),
            });
        }
    };
    Ok(element)
}

fn no_options(element: &'static str, config: &ElementConfig) -> Result<(), ChainConfigError> {
    Options::new(element, &config.options).reject_unknown(&[])
}
