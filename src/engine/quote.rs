//! Quote requests and the quotes produced for them.

use super::QuoteError;
use crate::domain::{
    ClId, Currency, CurrencyError, CurrencyTable, DomainName, Money, Phase, PrimitiveError,
    TransactionType, FX,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid domain name: {0}")]
    InvalidDomainName(PrimitiveError),
    #[error("invalid transaction type {0:?}")]
    InvalidTransactionType(String),
    #[error("invalid currency: {0}")]
    InvalidCurrency(#[from] CurrencyError),
    #[error("years must be between 1 and {max}, got {years}")]
    YearsOutOfRange { years: u32, max: u32 },
    #[error("invalid registrar id: {0}")]
    InvalidRegistrarId(PrimitiveError),
    #[error("phase name must not be empty")]
    EmptyPhaseName,
}

/// A request to price one domain operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub domain_name: DomainName,
    pub transaction_type: TransactionType,
    pub currency: Currency,
    pub years: u32,
    pub registrar_id: ClId,
    /// `None` selects the current GA phase.
    pub phase_name: Option<String>,
    /// Instant the quote is computed for.
    pub at: DateTime<Utc>,
}

impl QuoteRequest {
    /// Build a request from raw caller input, validating each field.
    pub fn parse(
        domain_name: &str,
        transaction_type: &str,
        currency: &str,
        years: u32,
        registrar_id: &str,
        table: &CurrencyTable,
    ) -> Result<Self, RequestError> {
        let domain_name = DomainName::parse(domain_name).map_err(RequestError::InvalidDomainName)?;
        let transaction_type = transaction_type
            .parse::<TransactionType>()
            .map_err(|_| RequestError::InvalidTransactionType(transaction_type.to_string()))?;
        let currency = Currency::parse(currency, table)?;
        let registrar_id = ClId::parse(registrar_id).map_err(RequestError::InvalidRegistrarId)?;

        Ok(QuoteRequest {
            domain_name,
            transaction_type,
            currency,
            years,
            registrar_id,
            phase_name: None,
            at: Utc::now(),
        })
    }

    pub fn with_phase(mut self, phase_name: impl Into<String>) -> Self {
        self.phase_name = Some(phase_name.into());
        self
    }

    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }

    /// Field checks that depend on configuration.
    pub fn validate(&self, max_horizon: u32) -> Result<(), RequestError> {
        if self.years == 0 || self.years > max_horizon {
            return Err(RequestError::YearsOutOfRange {
                years: self.years,
                max: max_horizon,
            });
        }
        if matches!(&self.phase_name, Some(name) if name.trim().is_empty()) {
            return Err(RequestError::EmptyPhaseName);
        }
        Ok(())
    }
}

/// One recorded line of a quote, in the currency it was priced in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteFee {
    pub name: String,
    pub amount: u64,
    pub currency: Currency,
    pub refundable: bool,
}

/// The priced answer to a [`QuoteRequest`]. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    /// Total in the requested currency.
    pub price: Money,
    pub fees: Vec<QuoteFee>,
    pub fx_rate: Option<FX>,
    pub domain_name: DomainName,
    pub years: u32,
    pub transaction_type: TransactionType,
    pub phase: String,
    /// The phase requires the registrant to be validated before the
    /// transaction completes.
    pub requires_validation: bool,
    pub registrar_id: ClId,
    pub class: String,
}

pub const STANDARD_CLASS: &str = "standard";

impl Quote {
    pub(crate) fn new(request: &QuoteRequest, phase: &Phase) -> Self {
        Quote {
            timestamp: request.at,
            price: Money::zero(request.currency.clone()),
            fees: Vec::new(),
            fx_rate: None,
            domain_name: request.domain_name.clone(),
            years: request.years,
            transaction_type: request.transaction_type,
            phase: phase.name.clone(),
            requires_validation: phase.policy.requires_validation,
            registrar_id: request.registrar_id.clone(),
            class: STANDARD_CLASS.to_string(),
        }
    }

    pub(crate) fn record(&mut self, name: &str, money: &Money, refundable: bool) {
        self.fees.push(QuoteFee {
            name: name.to_string(),
            amount: money.amount,
            currency: money.currency.clone(),
            refundable,
        });
    }

    /// Add `money` to the price, converting it through `fx` when its currency
    /// differs from the requested one.
    pub(crate) fn charge(&mut self, money: &Money, fx: Option<&FX>) -> Result<(), QuoteError> {
        let converted = if money.currency == self.price.currency {
            money.clone()
        } else {
            let fx = fx
                .filter(|fx| fx.from == money.currency && fx.to == self.price.currency)
                .ok_or_else(|| QuoteError::MissingFxRate {
                    from: money.currency.to_string(),
                    to: self.price.currency.to_string(),
                })?;
            self.fx_rate = Some(fx.clone());
            fx.convert(money)?
        };
        self.price = self.price.checked_add(&converted)?;
        Ok(())
    }

    /// Sum of all recorded lines in `currency`.
    pub fn fees_total(&self, currency: &Currency) -> u64 {
        self.fees
            .iter()
            .filter(|f| &f.currency == currency)
            .map(|f| f.amount)
            .sum()
    }
}
