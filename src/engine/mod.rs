//! Pure pricing engine for domain transactions.

use crate::domain::MoneyError;
use thiserror::Error;

pub mod pricing;
pub mod quote;

pub use pricing::{PricingEngine, GRANDFATHERING_FEE, PREMIUM_FEE};
pub use quote::{Quote, QuoteFee, QuoteRequest, RequestError, STANDARD_CLASS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("invalid quote request: {0}")]
    InvalidRequest(#[from] RequestError),
    #[error("phase {found} does not match requested phase {expected}")]
    InvalidPhaseName { expected: String, found: String },
    #[error("domain {found} does not match requested domain {expected}")]
    InvalidDomainName { expected: String, found: String },
    #[error("no exchange rate from {from} to {to}")]
    MissingFxRate { from: String, to: String },
    #[error("phase {phase} not found for TLD {tld}")]
    PhaseNotFound { phase: String, tld: String },
    #[error("domain {0} not found")]
    DomainNotFound(String),
    #[error("phase {phase} has no price in {currency} or in its base currency")]
    PriceNotFound { phase: String, currency: String },
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error("registry source error: {0}")]
    Source(String),
}
