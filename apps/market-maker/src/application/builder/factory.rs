//! Choosing a builder by update mode.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{BuilderContext, BuilderError, BuilderTarget, PollingModelStateBuilder, PushModelStateBuilder};
use crate::application::state::{ModelState, StateError};

/// How a builder keeps its facets current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelUpdateMode {
    /// Subscriptions publish every change as it arrives.
    #[default]
    Push,
    /// Every `build()` fetches fresh data.
    Poll,
}

impl fmt::Display for ModelUpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => f.write_str("push"),
            Self::Poll => f.write_str("poll"),
        }
    }
}

/// Produces model states for one market.
#[async_trait]
pub trait ModelStateBuilder: Send {
    /// A model state reflecting the most recent data.
    ///
    /// # Errors
    ///
    /// Returns an error if a facet has never produced a value.
    async fn build(&mut self) -> Result<ModelState, StateError>;

    /// Number of background subscriptions currently running.
    fn active_subscriptions(&self) -> usize;

    /// The builder's update mode.
    fn mode(&self) -> ModelUpdateMode;

    /// Stop any background work. Model states already handed out keep their
    /// last values.
    fn stop(&mut self) {}
}

/// Construct a builder for `target` in the given mode.
///
/// Every account the market needs is located before any subscription or poll
/// target is created. On error, nothing is left running.
///
/// # Errors
///
/// Returns `MissingAccount` naming the absent account, `MarketNotListed` if
/// the group does not list the market, or `State` if an initial value cannot
/// be loaded.
pub async fn model_state_builder_factory(
    mode: ModelUpdateMode,
    ctx: &BuilderContext,
    target: &BuilderTarget,
) -> Result<Box<dyn ModelStateBuilder>, BuilderError> {
    info!(%mode, market = %target.market.qualified_symbol(), "Creating model state builder");
    let builder: Box<dyn ModelStateBuilder> = match mode {
        ModelUpdateMode::Push => {
            Box::new(PushModelStateBuilder::start(ctx.clone(), target.clone()).await?)
        }
        ModelUpdateMode::Poll => {
            Box::new(PollingModelStateBuilder::new(ctx.clone(), target.clone()).await?)
        }
    };
    Ok(builder)
}
