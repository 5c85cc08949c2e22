//! Domain errors.

/// Errors raised while constructing or combining domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Two values denominated in different instruments were combined.
    #[error("instrument mismatch: {left} vs {right}")]
    InstrumentMismatch {
        /// Symbol of the left operand.
        left: String,
        /// Symbol of the right operand.
        right: String,
    },

    /// A qualified market symbol carries no recognised market kind prefix.
    #[error("could not determine type of market {market}")]
    UnknownMarketKind {
        /// The qualified market symbol.
        market: String,
    },
}

/// Errors raised when a raw account blob cannot be turned into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The blob is shorter than the layout requires.
    #[error("{record} data too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Record type being decoded.
        record: &'static str,
        /// Minimum length required.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// The blob is not the record type it was expected to be.
    #[error("{record} has unexpected layout: {message}")]
    InvalidLayout {
        /// Record type being decoded.
        record: &'static str,
        /// Details.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_display() {
        let err = DomainError::InvalidValue {
            field: "decimals".to_string(),
            message: "must not be negative".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("decimals"));
        assert!(msg.contains("negative"));
    }

    #[test]
    fn unknown_market_kind_names_market() {
        let err = DomainError::UnknownMarketKind {
            market: "futures:BTC/USDC".to_string(),
        };
        assert!(err.to_string().contains("futures:BTC/USDC"));
    }

    #[test]
    fn decode_error_display_names_record() {
        let err = DecodeError::TooShort {
            record: "OpenOrders",
            expected: 3228,
            actual: 12,
        };
        assert!(err.to_string().contains("OpenOrders"));
        assert!(err.to_string().contains("3228"));
    }
}
