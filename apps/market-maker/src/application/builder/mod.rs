//! Model State Builders
//!
//! Build a [`ModelState`](crate::application::state::ModelState) for one
//! market, either from live subscriptions (push) or by fetching everything
//! on each call (poll). Use [`model_state_builder_factory`] to pick one.

mod context;
mod error;
mod factory;
mod polling;
mod push;
mod report;
mod resolve;

pub use context::{BuilderContext, BuilderTarget, Deadlines};
pub use error::BuilderError;
pub use factory::{ModelStateBuilder, ModelUpdateMode, model_state_builder_factory};
pub use polling::PollingModelStateBuilder;
pub use push::PushModelStateBuilder;
