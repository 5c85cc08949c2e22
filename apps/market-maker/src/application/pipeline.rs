//! Order Pipeline
//!
//! One trading cycle's order handling: the strategy's desired orders pass
//! through the order chain, then are reconciled against the orders the
//! model state shows resting under the order owner.

use tracing::{debug, info, instrument};

use crate::application::order_chain::{ChainConfigError, ChainContext, ElementConfig, OrderChain};
use crate::application::reconciler::{OrderReconciler, ReconciledOrders, ReconcilerSettings};
use crate::application::state::ModelState;
use crate::domain::orders::Order;
use crate::infrastructure::metrics;

/// Order chain followed by a reconciler.
#[derive(Debug)]
pub struct OrderPipeline {
    chain: OrderChain,
    reconciler: Box<dyn OrderReconciler>,
}

impl OrderPipeline {
    /// Pipeline over a prepared chain and reconciler.
    #[must_use]
    pub fn new(chain: OrderChain, reconciler: Box<dyn OrderReconciler>) -> Self {
        Self { chain, reconciler }
    }

    /// Build the chain and reconciler from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a chain element is unknown or misconfigured.
    pub fn from_config(
        elements: &[ElementConfig],
        reconciler: &ReconcilerSettings,
    ) -> Result<Self, ChainConfigError> {
        let chain = OrderChain::from_config(elements)?;
        info!(
            elements = ?chain.element_names(),
            reconciler = reconciler.build().name(),
            "Order pipeline configured"
        );
        Ok(Self::new(chain, reconciler.build()))
    }

    /// The order chain.
    #[must_use]
    pub const fn chain(&self) -> &OrderChain {
        &self.chain
    }

    /// The reconciler's strategy name.
    #[must_use]
    pub fn reconciler_name(&self) -> &'static str {
        self.reconciler.name()
    }

    /// Adjust `desired` through the chain and reconcile it against the
    /// owner's existing orders.
    #[instrument(skip_all, fields(strategy = %context.strategy, cycle = context.cycle))]
    pub fn run(
        &self,
        context: &ChainContext,
        model_state: &ModelState,
        desired: Vec<Order>,
    ) -> ReconciledOrders {
        let existing = model_state.existing_orders();
        let adjusted = self.chain.process(context, model_state, desired);
        debug!(
            existing = existing.len(),
            desired = adjusted.len(),
            "Reconciling orders"
        );

        let reconciled = self.reconciler.reconcile(model_state, existing, adjusted);
        metrics::record_reconcile(
            self.reconciler.name(),
            reconciled.to_keep.len(),
            reconciled.to_ignore.len(),
            reconciled.to_cancel.len(),
            reconciled.to_place.len(),
        );
        if !reconciled.is_no_op() {
            info!(reconciler = self.reconciler.name(), %reconciled, "Orders reconciled");
        }
        reconciled
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::application::order_chain::MinimumQuantityElement;
    use crate::application::reconciler::{NullOrderReconciler, Tolerance};
    use crate::application::state::fixtures::{book_order, model_state_with_book, owner};
    use crate::domain::orders::{OrderBook, OrderType, Side};
    use crate::domain::shared::Address;

    fn state_with_own_orders() -> ModelState {
        let other = Address::from_seed("someone_else");
        let bids = vec![
            book_order(Side::Buy, dec!(99), dec!(10), owner()),
            book_order(Side::Buy, dec!(98), dec!(5), other),
        ];
        let asks = vec![book_order(Side::Sell, dec!(101), dec!(10), owner())];
        model_state_with_book(OrderBook::new("TEST/USDC", bids, asks), dec!(0.01))
    }

    fn desired() -> Vec<Order> {
        vec![
            Order::from_values(Side::Buy, dec!(99), dec!(10), OrderType::PostOnly),
            Order::from_values(Side::Sell, dec!(101.5), dec!(0.5), OrderType::PostOnly),
        ]
    }

    #[test]
    fn chain_runs_before_reconciliation() {
        let chain = OrderChain::default().with(MinimumQuantityElement::new(dec!(1), true));
        let pipeline = OrderPipeline::new(chain, Box::new(NullOrderReconciler));

        let reconciled = pipeline.run(
            &ChainContext::new("test", 1),
            &state_with_own_orders(),
            desired(),
        );

        assert_eq!(reconciled.to_keep.len(), 2);
        assert_eq!(reconciled.to_ignore.len(), 1);
        assert!(reconciled.is_no_op());
    }

    #[test]
    fn tolerance_keeps_matching_order_and_replaces_the_rest() {
        let settings = ReconcilerSettings::Tolerance {
            price_tolerance: Tolerance::Absolute(dec!(0.1)),
            quantity_tolerance: Tolerance::Absolute(dec!(1)),
        };
        let pipeline = OrderPipeline::new(OrderChain::default(), settings.build());

        let reconciled = pipeline.run(
            &ChainContext::new("test", 2),
            &state_with_own_orders(),
            desired(),
        );

        assert_eq!(reconciled.to_keep.len(), 1);
        assert_eq!(reconciled.to_keep[0].price, dec!(99));
        assert_eq!(reconciled.to_ignore.len(), 1);
        assert_eq!(reconciled.to_cancel.len(), 1);
        assert_eq!(reconciled.to_cancel[0].price, dec!(101));
        assert_eq!(reconciled.to_place.len(), 1);
        assert_eq!(reconciled.to_place[0].price, dec!(101.5));
        assert!(!reconciled.cancelling_all);
    }

    #[test]
    fn from_config_rejects_unknown_element() {
        let err = OrderPipeline::from_config(
            &[ElementConfig::named("does_not_exist")],
            &ReconcilerSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChainConfigError::UnknownElement { .. }));
    }

    #[test]
    fn from_config_selects_reconciler() {
        let pipeline = OrderPipeline::from_config(&[], &ReconcilerSettings::Null).unwrap();
        assert_eq!(pipeline.reconciler_name(), "null");
        assert!(pipeline.chain().is_empty());
    }
}
