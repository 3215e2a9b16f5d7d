//! Domain primitives: DomainName, ClId, TransactionType.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error("invalid domain name {name:?}: {reason}")]
    InvalidDomainName { name: String, reason: &'static str },
    #[error("invalid client identifier {0:?}: must be 3-16 printable characters")]
    InvalidClId(String),
    #[error("invalid transaction type {0:?}")]
    InvalidTransactionType(String),
}

/// A fully qualified, lower-cased domain name such as `example.tld`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Parse and normalize a domain name.
    ///
    /// Names must have at least two labels; each label is 1-63 characters of
    /// letters, digits and hyphens and may not start or end with a hyphen.
    pub fn parse(name: &str) -> Result<Self, PrimitiveError> {
        let invalid = |reason| PrimitiveError::InvalidDomainName {
            name: name.to_string(),
            reason,
        };

        let normalized = name.trim_end_matches('.').to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(invalid("empty name"));
        }
        if normalized.len() > MAX_NAME_LEN {
            return Err(invalid("longer than 253 characters"));
        }

        let mut labels = 0;
        for label in normalized.split('.') {
            labels += 1;
            if label.is_empty() {
                return Err(invalid("empty label"));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(invalid("label longer than 63 characters"));
            }
            if !label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
            {
                return Err(invalid("label contains characters outside LDH"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("label starts or ends with a hyphen"));
            }
        }
        if labels < 2 {
            return Err(invalid("name must be below a TLD"));
        }

        Ok(DomainName(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leftmost label, the part premium lists are keyed on.
    pub fn label(&self) -> &str {
        self.0.split_once('.').map(|(label, _)| label).unwrap_or(&self.0)
    }

    /// Everything right of the leftmost label.
    pub fn tld(&self) -> &str {
        self.0.split_once('.').map(|(_, tld)| tld).unwrap_or("")
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DomainName {
    type Error = PrimitiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DomainName::parse(&value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

/// Client (registrar) identifier, the EPP `clIDType`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClId(String);

impl ClId {
    pub fn parse(id: &str) -> Result<Self, PrimitiveError> {
        let len = id.chars().count();
        if !(3..=16).contains(&len) || !id.chars().all(|c| c.is_ascii_graphic()) {
            return Err(PrimitiveError::InvalidClId(id.to_string()));
        }
        Ok(ClId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClId {
    type Error = PrimitiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClId::parse(&value)
    }
}

impl From<ClId> for String {
    fn from(value: ClId) -> Self {
        value.0
    }
}

/// A priced domain operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Registration,
    Renewal,
    Transfer,
    Restore,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Registration => "registration",
            TransactionType::Renewal => "renewal",
            TransactionType::Transfer => "transfer",
            TransactionType::Restore => "restore",
        }
    }

    /// Name of the quote line recorded for standard pricing.
    pub fn fee_name(&self) -> String {
        format!("{} fee", self.as_str())
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(TransactionType::Registration),
            "renewal" => Ok(TransactionType::Renewal),
            "transfer" => Ok(TransactionType::Transfer),
            "restore" => Ok(TransactionType::Restore),
            other => Err(PrimitiveError::InvalidTransactionType(other.to_string())),
        }
    }
}
