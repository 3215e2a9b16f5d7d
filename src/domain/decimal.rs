//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Used for exchange rates and for the intermediate step of currency
//! conversion. Stored amounts never leave integer minor units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for rate calculations.
///
/// Backed by rust_decimal to avoid floating-point drift.
/// Serializes to JSON number (not string) by default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    /// The multiplicative identity (1).
    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// Lift an integer minor-unit amount into major units, e.g. `1050` cents
    /// with exponent 2 becomes `10.50`.
    pub fn from_minor(amount: u64, exponent: u32) -> Option<Self> {
        RustDecimal::try_from_i128_with_scale(i128::from(amount), exponent)
            .ok()
            .map(Decimal)
    }

    /// Express a major-unit value in minor units, rounding half away from zero.
    ///
    /// Returns `None` for negative values or values that do not fit in a u64.
    pub fn to_minor(&self, exponent: u32) -> Option<u64> {
        let factor = RustDecimal::from(10u64.checked_pow(exponent)?);
        self.0
            .checked_mul(factor)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
    }

    /// Multiplicative inverse; `None` for zero.
    pub fn checked_recip(&self) -> Option<Self> {
        RustDecimal::ONE.checked_div(self.0).map(Decimal)
    }

    /// Multiplication that reports overflow instead of panicking.
    pub fn checked_mul(&self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}
