//! On-chain account address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A 32-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// The system program address. Used as the order owner when no
    /// open-orders account exists yet.
    pub const SYSTEM_PROGRAM: Self = Self([0; 32]);

    /// Create an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic address from a seed string.
    ///
    /// Only useful for fixtures and local wiring; real addresses come from
    /// the account locator.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        let mut bytes = [0u8; 32];
        for (i, b) in seed.bytes().enumerate() {
            let slot = i % 32;
            bytes[slot] = bytes[slot].wrapping_mul(31).wrapping_add(b);
        }
        bytes[31] |= 1;
        Self(bytes)
    }

    /// Raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| DomainError::InvalidValue {
            field: "address".to_string(),
            message: message.to_string(),
        };

        if s.len() != 64 {
            return Err(invalid("expected 64 hex characters"));
        }

        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|_| invalid("not valid utf-8"))?;
            bytes[i] = u8::from_str_radix(pair, 16).map_err(|_| invalid("not valid hex"))?;
        }
        Ok(Self(bytes))
    }
}
