//! Monetary primitives: Money, Price and Fee. All amounts are integer minor units.

use crate::domain::{Currency, TransactionType};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch { expected: String, found: String },
    #[error("amount overflow")]
    Overflow,
    #[error("fee name must not be empty")]
    EmptyFeeName,
    #[error("invalid exchange rate {0}: must be positive")]
    InvalidRate(String),
    #[error("exchange rate must convert between two different currencies, got {0}")]
    SameCurrency(String),
}

/// An amount in a currency's minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub currency: Currency,
    pub amount: u64,
}

impl Money {
    pub fn new(currency: Currency, amount: u64) -> Self {
        Money { currency, amount }
    }

    pub fn zero(currency: Currency) -> Self {
        Money::new(currency, 0)
    }

    /// Multiply by a number of years.
    pub fn checked_mul(&self, years: u32) -> Result<Money, MoneyError> {
        let amount = self
            .amount
            .checked_mul(u64::from(years))
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(self.currency.clone(), amount))
    }

    /// Add two amounts of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: other.currency.to_string(),
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(self.currency.clone(), amount))
    }
}

/// Base prices of a phase in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    pub currency: Currency,
    pub registration_amount: u64,
    pub renewal_amount: u64,
    pub transfer_amount: u64,
    pub restore_amount: u64,
}

impl Price {
    pub fn new(
        currency: Currency,
        registration_amount: u64,
        renewal_amount: u64,
        transfer_amount: u64,
        restore_amount: u64,
    ) -> Self {
        Price {
            currency,
            registration_amount,
            renewal_amount,
            transfer_amount,
            restore_amount,
        }
    }

    pub fn amount_for(&self, transaction: TransactionType) -> u64 {
        match transaction {
            TransactionType::Registration => self.registration_amount,
            TransactionType::Renewal => self.renewal_amount,
            TransactionType::Transfer => self.transfer_amount,
            TransactionType::Restore => self.restore_amount,
        }
    }

    pub fn money_for(&self, transaction: TransactionType) -> Money {
        Money::new(self.currency.clone(), self.amount_for(transaction))
    }
}

/// A named charge added on top of the price of every operation in a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fee {
    pub currency: Currency,
    pub name: String,
    pub amount: u64,
    pub refundable: bool,
}

impl Fee {
    pub fn new(
        currency: Currency,
        name: impl Into<String>,
        amount: u64,
        refundable: bool,
    ) -> Result<Self, MoneyError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(MoneyError::EmptyFeeName);
        }
        Ok(Fee {
            currency,
            name,
            amount,
            refundable,
        })
    }

    pub fn money(&self) -> Money {
        Money::new(self.currency.clone(), self.amount)
    }
}
