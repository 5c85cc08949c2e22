//! The order chain element contract.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ChainConfigError;
use crate::application::state::ModelState;
use crate::domain::orders::Order;

/// Per-cycle information passed to every element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainContext {
    /// Name of the strategy producing the orders.
    pub strategy: String,
    /// Pipeline cycle number.
    pub cycle: u64,
}

impl ChainContext {
    /// Create a context.
    #[must_use]
    pub fn new(strategy: impl Into<String>, cycle: u64) -> Self {
        Self {
            strategy: strategy.into(),
            cycle,
        }
    }
}

/// One stage of the order chain.
///
/// `process` must be a pure function of its inputs: no I/O and no shared
/// mutable state.
pub trait OrderChainElement: Send + Sync + fmt::Debug {
    /// Element name, used in logs.
    fn name(&self) -> &'static str;

    /// Transform the desired orders.
    fn process(
        &self,
        context: &ChainContext,
        model_state: &ModelState,
        orders: Vec<Order>,
    ) -> Vec<Order>;
}

/// Configuration of one element: its name and named options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    /// Element name (case-insensitive).
    pub name: String,
    /// Element options.
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl ElementConfig {
    /// Config with no options.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Add an option.
    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(option.into(), value);
        self
    }
}

/// Typed access to an element's options.
pub(crate) struct Options<'a> {
    element: &'static str,
    values: &'a BTreeMap<String, serde_json::Value>,
}

impl<'a> Options<'a> {
    pub(crate) const fn new(
        element: &'static str,
        values: &'a BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self { element, values }
    }

    fn invalid(&self, option: &str, message: impl Into<String>) -> ChainConfigError {
        ChainConfigError::InvalidOption {
            element: self.element.to_string(),
            option: option.to_string(),
            message: message.into(),
        }
    }

    /// Fail on the first option not listed in `known`.
    pub(crate) fn reject_unknown(&self, known: &[&str]) -> Result<(), ChainConfigError> {
        match self.values.keys().find(|key| !known.contains(&key.as_str())) {
            None => Ok(()),
            Some(key) if known.is_empty() => Err(self.invalid(key, "element takes no options")),
            Some(key) => Err(self.invalid(
                key,
                format!("unknown option, expected one of: {}", known.join(", ")),
            )),
        }
    }

    /// A required decimal option. Accepts numbers and numeric strings.
    pub(crate) fn decimal(&self, option: &str) -> Result<Decimal, ChainConfigError> {
        let value = self
            .values
            .get(option)
            .ok_or_else(|| ChainConfigError::MissingOption {
                element: self.element.to_string(),
                option: option.to_string(),
            })?;
        let text = match value {
            serde_json::Value::Number(number) => number.to_string(),
            serde_json::Value::String(text) => text.clone(),
            other => return Err(self.invalid(option, format!("expected a number, got {other}"))),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|e| self.invalid(option, e.to_string()))
    }

    /// A required decimal option that must not be negative.
    pub(crate) fn non_negative_decimal(&self, option: &str) -> Result<Decimal, ChainConfigError> {
        let value = self.decimal(option)?;
        if value.is_sign_negative() {
            return Err(self.invalid(option, format!("must not be negative, got {value}")));
        }
        Ok(value)
    }

    /// An optional boolean option.
    pub(crate) fn bool_or(&self, option: &str, default: bool) -> Result<bool, ChainConfigError> {
        match self.values.get(option) {
            None => Ok(default),
            Some(serde_json::Value::Bool(value)) => Ok(*value),
            Some(other) => Err(self.invalid(option, format!("expected true or false, got {other}"))),
        }
    }
}
