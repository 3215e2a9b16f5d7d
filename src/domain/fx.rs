//! Point-in-time exchange rates.

use crate::domain::{Currency, Decimal, Money, MoneyError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A directed exchange rate: one unit of `from` buys `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FX {
    pub date: DateTime<Utc>,
    pub from: Currency,
    pub to: Currency,
    pub rate: Decimal,
}

impl FX {
    pub fn new(
        date: DateTime<Utc>,
        from: Currency,
        to: Currency,
        rate: Decimal,
    ) -> Result<Self, MoneyError> {
        if !rate.is_positive() {
            return Err(MoneyError::InvalidRate(rate.to_canonical_string()));
        }
        if from == to {
            return Err(MoneyError::SameCurrency(from.to_string()));
        }
        Ok(FX {
            date,
            from,
            to,
            rate,
        })
    }

    /// The rate for the opposite direction.
    pub fn inverse(&self) -> Result<FX, MoneyError> {
        let rate = self
            .rate
            .checked_recip()
            .ok_or_else(|| MoneyError::InvalidRate(self.rate.to_canonical_string()))?;
        FX::new(self.date, self.to.clone(), self.from.clone(), rate)
    }

    /// Convert `money` from `self.from` into `self.to`.
    ///
    /// The computation runs in decimal major units and is rounded half away
    /// from zero to the target currency's minor unit.
    pub fn convert(&self, money: &Money) -> Result<Money, MoneyError> {
        if money.currency != self.from {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.from.to_string(),
                found: money.currency.to_string(),
            });
        }
        let major = Decimal::from_minor(money.amount, self.from.exponent())
            .ok_or(MoneyError::Overflow)?;
        let amount = major
            .checked_mul(self.rate)
            .and_then(|converted| converted.to_minor(self.to.exponent()))
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(self.to.clone(), amount))
    }
}
