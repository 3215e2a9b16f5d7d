//! ISO 4217 currency codes validated against an injected table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("malformed currency code {0:?}: expected three ASCII letters")]
    Malformed(String),
    #[error("unknown currency {0}")]
    Unknown(String),
}

/// Known currencies and the number of decimal places of their minor unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTable {
    exponents: HashMap<String, u32>,
}

// (code, minor-unit exponent)
#[rustfmt::skip]
const ISO_4217: &[(&str, u32)] = &[
    ("AED", 2), ("ARS", 2), ("AUD", 2), ("BGN", 2), ("BHD", 3), ("BRL", 2),
    ("CAD", 2), ("CHF", 2), ("CLP", 0), ("CNY", 2), ("COP", 2), ("CZK", 2),
    ("DKK", 2), ("EGP", 2), ("EUR", 2), ("GBP", 2), ("HKD", 2), ("HUF", 2),
    ("IDR", 2), ("ILS", 2), ("INR", 2), ("ISK", 0), ("JOD", 3), ("JPY", 0),
    ("KES", 2), ("KRW", 0), ("KWD", 3), ("MAD", 2), ("MXN", 2), ("MYR", 2),
    ("NGN", 2), ("NOK", 2), ("NZD", 2), ("OMR", 3), ("PEN", 2), ("PHP", 2),
    ("PKR", 2), ("PLN", 2), ("QAR", 2), ("RON", 2), ("SAR", 2), ("SEK", 2),
    ("SGD", 2), ("THB", 2), ("TND", 3), ("TRY", 2), ("TWD", 2), ("UAH", 2),
    ("USD", 2), ("VND", 0), ("ZAR", 2),
];

impl CurrencyTable {
    /// The built-in ISO 4217 table.
    pub fn iso4217() -> Self {
        Self::from_entries(ISO_4217.iter().copied())
    }

    /// Build a table from explicit entries, e.g. a minimal test fixture.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self {
            exponents: entries
                .into_iter()
                .map(|(code, exp)| (code.to_ascii_uppercase(), exp))
                .collect(),
        }
    }

    pub fn exponent(&self, code: &str) -> Option<u32> {
        self.exponents.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.exponents.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exponents.is_empty()
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::iso4217()
    }
}

/// An upper-cased ISO currency code together with its minor-unit exponent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency {
    code: String,
    exponent: u32,
}

impl Currency {
    /// Validate `code` against `table`. Lower-case input is accepted and upper-cased.
    pub fn parse(code: &str, table: &CurrencyTable) -> Result<Self, CurrencyError> {
        let code = code.trim();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(CurrencyError::Malformed(code.to_string()));
        }
        let code = code.to_ascii_uppercase();
        let exponent = table
            .exponent(&code)
            .ok_or_else(|| CurrencyError::Unknown(code.clone()))?;
        Ok(Currency { code, exponent })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Decimal places of the minor unit (2 for USD cents, 0 for JPY).
    pub fn exponent(&self) -> u32 {
        self.exponent
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.code)
    }
}

/// Stored records carry only the code; it is checked against the ISO 4217
/// table. Use [`Currency::parse`] to validate against another table.
impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Currency::parse(&code, &CurrencyTable::iso4217()).map_err(serde::de::Error::custom)
    }
}
