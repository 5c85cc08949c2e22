//! Instruments, tokens and instrument-denominated amounts.

use std::fmt;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Address, DomainError};

/// Largest decimal precision `rust_decimal` can represent exactly.
const MAX_DECIMALS: u32 = 28;

/// A tradeable instrument.
///
/// Symbols are normalised to uppercase so comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    symbol: String,
    name: String,
    decimals: u32,
}

impl Instrument {
    /// Create a new instrument.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimals` exceeds what a `Decimal` can hold.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u32,
    ) -> Result<Self, DomainError> {
        if decimals > MAX_DECIMALS {
            return Err(DomainError::InvalidValue {
                field: "decimals".to_string(),
                message: format!("{decimals} exceeds maximum of {MAX_DECIMALS}"),
            });
        }
        Ok(Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            decimals,
        })
    }

    /// Uppercase symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decimal precision of native amounts.
    #[must_use]
    pub const fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Case-insensitive symbol comparison.
    #[must_use]
    pub fn symbols_match(left: &str, right: &str) -> bool {
        left.eq_ignore_ascii_case(right)
    }

    /// Whether this instrument has the given symbol.
    #[must_use]
    pub fn has_symbol(&self, symbol: &str) -> bool {
        Self::symbols_match(&self.symbol, symbol)
    }

    /// Convert a native (integer, undecimalised) amount to a decimal amount.
    #[must_use]
    pub fn shift_to_decimals(&self, native: Decimal) -> Decimal {
        native * Decimal::new(1, self.decimals)
    }

    /// Convert a decimal amount to native units.
    #[must_use]
    pub fn shift_to_native(&self, value: Decimal) -> Decimal {
        value / Decimal::new(1, self.decimals)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// An instrument backed by an SPL-style mint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    instrument: Instrument,
    mint: Address,
}

impl Token {
    /// Create a new token.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimals` is out of range.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u32,
        mint: Address,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            instrument: Instrument::new(symbol, name, decimals)?,
            mint,
        })
    }

    /// The underlying instrument.
    #[must_use]
    pub const fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Uppercase symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.instrument.symbol()
    }

    /// Decimal precision.
    #[must_use]
    pub const fn decimals(&self) -> u32 {
        self.instrument.decimals()
    }

    /// Mint address.
    #[must_use]
    pub const fn mint(&self) -> Address {
        self.mint
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instrument)
    }
}

/// An amount denominated in a specific instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentValue {
    /// The instrument the amount is denominated in.
    pub instrument: Instrument,
    /// Decimal amount.
    pub value: Decimal,
}

impl InstrumentValue {
    /// Create a new value.
    #[must_use]
    pub const fn new(instrument: Instrument, value: Decimal) -> Self {
        Self { instrument, value }
    }

    /// Zero of the given instrument.
    #[must_use]
    pub const fn zero(instrument: Instrument) -> Self {
        Self::new(instrument, Decimal::ZERO)
    }

    /// Build a value from a native amount.
    #[must_use]
    pub fn from_native(instrument: Instrument, native: Decimal) -> Self {
        let value = instrument.shift_to_decimals(native);
        Self::new(instrument, value)
    }

    /// Add two values of the same instrument.
    ///
    /// # Errors
    ///
    /// Returns `InstrumentMismatch` if the instruments differ.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        if self.instrument != other.instrument {
            return Err(DomainError::InstrumentMismatch {
                left: self.instrument.symbol().to_string(),
                right: other.instrument.symbol().to_string(),
            });
        }
        Ok(Self::new(self.instrument.clone(), self.value + other.value))
    }
}

impl Add<Decimal> for InstrumentValue {
    type Output = Self;

    fn add(self, rhs: Decimal) -> Self {
        Self::new(self.instrument, self.value + rhs)
    }
}

impl fmt::Display for InstrumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>18} {}", self.value, self.instrument)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn usdc() -> Instrument {
        Instrument::new("usdc", "USD Coin", 6).unwrap()
    }

    #[test]
    fn instrument_constructor() {
        let actual = Instrument::new("TEST", "Test Instrument", 18).unwrap();
        assert_eq!(actual.symbol(), "TEST");
        assert_eq!(actual.name(), "Test Instrument");
        assert_eq!(actual.decimals(), 18);
    }

    #[test]
    fn instrument_uppercases_symbol() {
        let actual = Instrument::new("test1", "Test Instrument", 18).unwrap();
        assert_eq!(actual.symbol(), "TEST1");
    }

    #[test]
    fn instrument_rejects_excessive_decimals() {
        assert!(Instrument::new("X", "X", 29).is_err());
    }

    #[test]
    fn token_uppercases_symbol() {
        let token = Token::new("test2", "Test Token", 18, Address::from_seed("mint")).unwrap();
        assert_eq!(token.symbol(), "TEST2");
        assert_eq!(token.mint(), Address::from_seed("mint"));
    }

    #[test]
    fn symbol_matching() {
        assert!(Instrument::symbols_match("BTC", "BTC"));
        assert!(Instrument::symbols_match("eth", "eth"));
        assert!(Instrument::symbols_match("btc", "BTC"));
        assert!(Instrument::symbols_match("ETH", "eth"));
        assert!(!Instrument::symbols_match("ETH", "BTC"));
    }

    #[test]
    fn shifting_native_amounts() {
        let usdc = usdc();
        assert_eq!(usdc.shift_to_decimals(dec!(1_500_000)), dec!(1.5));
        assert_eq!(usdc.shift_to_native(dec!(1.5)), dec!(1_500_000));
        let value = InstrumentValue::from_native(usdc, dec!(2_000_000));
        assert_eq!(value.value, dec!(2));
    }

    #[test]
    fn checked_add_requires_same_instrument() {
        let a = InstrumentValue::new(usdc(), dec!(1));
        let b = InstrumentValue::new(usdc(), dec!(2));
        assert_eq!(a.checked_add(&b).unwrap().value, dec!(3));

        let sol = InstrumentValue::new(Instrument::new("SOL", "Solana", 9).unwrap(), dec!(1));
        assert!(a.checked_add(&sol).is_err());
    }
}
