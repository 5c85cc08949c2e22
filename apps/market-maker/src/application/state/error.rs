//! State aggregation errors.

use std::time::Duration;

use crate::application::ports::DataSourceError;
use crate::domain::shared::{DecodeError, DomainError};

/// Errors raised while refreshing a facet.
///
/// Every variant names the facet it concerns, so a failure can be reported
/// against that facet alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Raw data could not be decoded.
    #[error("facet '{facet}': {source}")]
    Decode {
        /// Facet name.
        facet: String,
        /// Underlying decode error.
        source: DecodeError,
    },

    /// The data source failed.
    #[error("facet '{facet}': {source}")]
    DataSource {
        /// Facet name.
        facet: String,
        /// Underlying data source error.
        source: DataSourceError,
    },

    /// A derived value could not be computed from its inputs.
    #[error("facet '{facet}': {source}")]
    Derivation {
        /// Facet name.
        facet: String,
        /// Underlying domain error.
        source: DomainError,
    },

    /// A remote operation did not finish before its deadline.
    #[error("facet '{facet}' timed out after {after:?}")]
    Timeout {
        /// Facet name.
        facet: String,
        /// The deadline that expired.
        after: Duration,
    },

    /// The facet's subscription stream ended.
    #[error("facet '{facet}' subscription closed")]
    SubscriptionClosed {
        /// Facet name.
        facet: String,
    },

    /// The facet has never produced a value.
    #[error("facet '{facet}' has no value yet")]
    FacetUnavailable {
        /// Facet name.
        facet: String,
    },
}

impl StateError {
    /// Name of the facet the error concerns.
    #[must_use]
    pub fn facet(&self) -> &str {
        match self {
            Self::Decode { facet, .. }
            | Self::DataSource { facet, .. }
            | Self::Derivation { facet, .. }
            | Self::Timeout { facet, .. }
            | Self::SubscriptionClosed { facet }
            | Self::FacetUnavailable { facet } => facet,
        }
    }

    /// The same error, attributed to another facet.
    ///
    /// Used when a facet fails because a record it is derived from failed.
    #[must_use]
    pub fn with_facet(&self, facet: &str) -> Self {
        let facet = facet.to_string();
        match self.clone() {
            Self::Decode { source, .. } => Self::Decode { facet, source },
            Self::DataSource { source, .. } => Self::DataSource { facet, source },
            Self::Derivation { source, .. } => Self::Derivation { facet, source },
            Self::Timeout { after, .. } => Self::Timeout { facet, after },
            Self::SubscriptionClosed { .. } => Self::SubscriptionClosed { facet },
            Self::FacetUnavailable { .. } => Self::FacetUnavailable { facet },
        }
    }

    /// Short machine-readable kind, used as a metric label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::DataSource { .. } => "data_source",
            Self::Derivation { .. } => "derivation",
            Self::Timeout { .. } => "timeout",
            Self::SubscriptionClosed { .. } => "subscription_closed",
            Self::FacetUnavailable { .. } => "unavailable",
        }
    }
}
