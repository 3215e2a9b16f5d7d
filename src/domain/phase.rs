//! Sales phases of a TLD and the price/fee tables they own.

use crate::domain::{Currency, Fee, Price};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("phase name must not be empty")]
    EmptyName,
    #[error("phase {phase} already has a price in {currency}")]
    DuplicatePrice { phase: String, currency: String },
    #[error("phase {phase} has no price in {currency}")]
    PriceNotFound { phase: String, currency: String },
    #[error("phase {phase} already has fee {name:?} in {currency}")]
    DuplicateFee {
        phase: String,
        name: String,
        currency: String,
    },
    #[error("phase {phase} has no fee {name:?} in {currency}")]
    FeeNotFound {
        phase: String,
        name: String,
        currency: String,
    },
    #[error("phase end {ends} is before its start {starts}")]
    EndBeforeStart {
        starts: DateTime<Utc>,
        ends: DateTime<Utc>,
    },
    #[error("phase end {0} is in the past")]
    EndInPast(DateTime<Utc>),
    #[error("max horizon must be at least one year")]
    InvalidHorizon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhaseType {
    GA,
    Launch,
}

/// Commercial policy of a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhasePolicy {
    /// Currency every phase price is expected to exist in; the conversion source.
    pub base_currency: Currency,
    /// Longest registration period in years the phase sells.
    pub max_horizon: u32,
    /// Launch phases may require registrant validation before allocation.
    pub requires_validation: bool,
}

impl PhasePolicy {
    pub fn new(base_currency: Currency, max_horizon: u32) -> Result<Self, PhaseError> {
        if max_horizon == 0 {
            return Err(PhaseError::InvalidHorizon);
        }
        Ok(PhasePolicy {
            base_currency,
            max_horizon,
            requires_validation: false,
        })
    }

    pub fn with_validation(mut self) -> Self {
        self.requires_validation = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub name: String,
    pub tld: String,
    pub phase_type: PhaseType,
    pub starts: DateTime<Utc>,
    ends: Option<DateTime<Utc>>,
    prices: Vec<Price>,
    fees: Vec<Fee>,
    pub premium_list_name: Option<String>,
    pub policy: PhasePolicy,
}

impl Phase {
    pub fn new(
        name: impl Into<String>,
        tld: impl Into<String>,
        phase_type: PhaseType,
        starts: DateTime<Utc>,
        policy: PhasePolicy,
    ) -> Result<Self, PhaseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PhaseError::EmptyName);
        }
        Ok(Phase {
            name,
            tld: tld.into().to_ascii_lowercase(),
            phase_type,
            starts,
            ends: None,
            prices: Vec::new(),
            fees: Vec::new(),
            premium_list_name: None,
            policy,
        })
    }

    pub fn with_premium_list(mut self, list: impl Into<String>) -> Self {
        self.premium_list_name = Some(list.into());
        self
    }

    pub fn is_ga(&self) -> bool {
        self.phase_type == PhaseType::GA
    }

    pub fn base_currency(&self) -> &Currency {
        &self.policy.base_currency
    }

    pub fn ends(&self) -> Option<DateTime<Utc>> {
        self.ends
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn fees(&self) -> &[Fee] {
        &self.fees
    }

    /// Whether the phase is open at `at`. The end instant is exclusive.
    pub fn is_current(&self, at: DateTime<Utc>) -> bool {
        self.starts <= at && self.ends.map_or(true, |ends| at < ends)
    }

    /// Set or move the end of the phase.
    pub fn set_end(&mut self, ends: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), PhaseError> {
        if ends < self.starts {
            return Err(PhaseError::EndBeforeStart {
                starts: self.starts,
                ends,
            });
        }
        if ends < now {
            return Err(PhaseError::EndInPast(ends));
        }
        self.ends = Some(ends);
        Ok(())
    }

    /// Add a price. At most one price may exist per currency.
    pub fn add_price(&mut self, price: Price) -> Result<(), PhaseError> {
        if self.price_for(&price.currency).is_some() {
            return Err(PhaseError::DuplicatePrice {
                phase: self.name.clone(),
                currency: price.currency.to_string(),
            });
        }
        self.prices.push(price);
        Ok(())
    }

    pub fn delete_price(&mut self, currency: &Currency) -> Result<Price, PhaseError> {
        let idx = self
            .prices
            .iter()
            .position(|p| &p.currency == currency)
            .ok_or_else(|| PhaseError::PriceNotFound {
                phase: self.name.clone(),
                currency: currency.to_string(),
            })?;
        Ok(self.prices.remove(idx))
    }

    /// Add a fee. At most one fee may exist per (name, currency).
    pub fn add_fee(&mut self, fee: Fee) -> Result<(), PhaseError> {
        if self
            .fees
            .iter()
            .any(|f| f.name == fee.name && f.currency == fee.currency)
        {
            return Err(PhaseError::DuplicateFee {
                phase: self.name.clone(),
                name: fee.name,
                currency: fee.currency.to_string(),
            });
        }
        self.fees.push(fee);
        Ok(())
    }

    pub fn delete_fee(&mut self, name: &str, currency: &Currency) -> Result<Fee, PhaseError> {
        let idx = self
            .fees
            .iter()
            .position(|f| f.name == name && &f.currency == currency)
            .ok_or_else(|| PhaseError::FeeNotFound {
                phase: self.name.clone(),
                name: name.to_string(),
                currency: currency.to_string(),
            })?;
        Ok(self.fees.remove(idx))
    }

    pub fn price_for(&self, currency: &Currency) -> Option<&Price> {
        self.prices.iter().find(|p| &p.currency == currency)
    }

    pub fn base_price(&self) -> Option<&Price> {
        self.price_for(&self.policy.base_currency)
    }

    pub fn fees_for<'a>(&'a self, currency: &'a Currency) -> impl Iterator<Item = &'a Fee> + 'a {
        self.fees.iter().filter(move |f| &f.currency == currency)
    }
}
