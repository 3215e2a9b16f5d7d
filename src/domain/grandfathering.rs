//! Legacy price lock-in attached to a domain.

use crate::domain::{Currency, Money, TransactionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrandFatheringError {
    #[error("date-conditioned grandfathering requires a void date")]
    MissingVoidDate,
}

/// Event that ends a grandfathered price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryCondition {
    Transfer,
    Delete,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GrantRecord")]
pub struct DomainGrandFathering {
    pub amount: u64,
    pub currency: Currency,
    pub expiry_condition: ExpiryCondition,
    pub void_date: Option<DateTime<Utc>>,
}

/// Unchecked wire form; converted through [`DomainGrandFathering::new`].
#[derive(Deserialize)]
struct GrantRecord {
    amount: u64,
    currency: Currency,
    expiry_condition: ExpiryCondition,
    #[serde(default)]
    void_date: Option<DateTime<Utc>>,
}

impl TryFrom<GrantRecord> for DomainGrandFathering {
    type Error = GrandFatheringError;

    fn try_from(record: GrantRecord) -> Result<Self, Self::Error> {
        DomainGrandFathering::new(
            record.amount,
            record.currency,
            record.expiry_condition,
            record.void_date,
        )
    }
}

impl DomainGrandFathering {
    pub fn new(
        amount: u64,
        currency: Currency,
        expiry_condition: ExpiryCondition,
        void_date: Option<DateTime<Utc>>,
    ) -> Result<Self, GrandFatheringError> {
        if expiry_condition == ExpiryCondition::Date && void_date.is_none() {
            return Err(GrandFatheringError::MissingVoidDate);
        }
        Ok(DomainGrandFathering {
            amount,
            currency,
            expiry_condition,
            void_date,
        })
    }

    /// The locked-in yearly renewal price.
    pub fn money(&self) -> Money {
        Money::new(self.currency.clone(), self.amount)
    }

    /// False once a date condition has been reached.
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        match (self.expiry_condition, self.void_date) {
            (ExpiryCondition::Date, Some(void_date)) => at < void_date,
            _ => true,
        }
    }

    /// Whether completing `transaction` ends the grant.
    pub fn voided_by(&self, transaction: TransactionType) -> bool {
        self.expiry_condition == ExpiryCondition::Transfer
            && transaction == TransactionType::Transfer
    }
}
