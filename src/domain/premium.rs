//! Premium labels: per-label override pricing grouped into named lists.

use crate::domain::{Currency, Money, TransactionType};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PremiumError {
    #[error("premium label must not be empty")]
    EmptyLabel,
    #[error("premium label {label:?} belongs to list {found}, not {expected}")]
    WrongList {
        label: String,
        expected: String,
        found: String,
    },
    #[error("premium list {list} already prices {label:?} in {currency}")]
    DuplicateLabel {
        list: String,
        label: String,
        currency: String,
    },
    #[error("premium list {list} has no entry for {label:?} in {currency}")]
    LabelNotFound {
        list: String,
        label: String,
        currency: String,
    },
}

/// One row of a premium list: override prices for a label in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PremiumLabel {
    pub label: String,
    pub registration_amount: u64,
    pub renewal_amount: u64,
    pub transfer_amount: u64,
    pub restore_amount: u64,
    pub currency: Currency,
    /// Pricing class reported on quotes, e.g. "platinum".
    pub class: String,
    pub premium_list_name: String,
}

impl PremiumLabel {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        label: &str,
        registration_amount: u64,
        renewal_amount: u64,
        transfer_amount: u64,
        restore_amount: u64,
        currency: Currency,
        class: impl Into<String>,
        premium_list_name: impl Into<String>,
    ) -> Result<Self, PremiumError> {
        let label = label.trim().to_ascii_lowercase();
        if label.is_empty() {
            return Err(PremiumError::EmptyLabel);
        }
        Ok(PremiumLabel {
            label,
            registration_amount,
            renewal_amount,
            transfer_amount,
            restore_amount,
            currency,
            class: class.into(),
            premium_list_name: premium_list_name.into(),
        })
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

/// A named premium list referenced by phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PremiumList {
    pub name: String,
    pub tld: String,
    pub description: String,
    labels: Vec<PremiumLabel>,
}

impl PremiumList {
    pub fn new(name: impl Into<String>, tld: impl Into<String>, description: impl Into<String>) -> Self {
        PremiumList {
            name: name.into(),
            tld: tld.into(),
            description: description.into(),
            labels: Vec::new(),
        }
    }

    /// Add a row; one row per (label, currency) within the list.
    pub fn add_label(&mut self, label: PremiumLabel) -> Result<(), PremiumError> {
        if label.premium_list_name != self.name {
            return Err(PremiumError::WrongList {
                label: label.label,
                expected: self.name.clone(),
                found: label.premium_list_name,
            });
        }
        if self
            .labels
            .iter()
            .any(|l| l.label == label.label && l.currency == label.currency)
        {
            return Err(PremiumError::DuplicateLabel {
                list: self.name.clone(),
                label: label.label,
                currency: label.currency.to_string(),
            });
        }
        self.labels.push(label);
        Ok(())
    }

    pub fn delete_label(
        &mut self,
        label: &str,
        currency: &Currency,
    ) -> Result<PremiumLabel, PremiumError> {
        let idx = self
            .labels
            .iter()
            .position(|l| l.label == label && &l.currency == currency)
            .ok_or_else(|| PremiumError::LabelNotFound {
                list: self.name.clone(),
                label: label.to_string(),
                currency: currency.to_string(),
            })?;
        Ok(self.labels.remove(idx))
    }

    /// Every row for `label`, in insertion order.
    pub fn entries_for(&self, label: &str) -> Vec<PremiumLabel> {
        self.labels
            .iter()
            .filter(|l| l.label == label)
            .cloned()
            .collect()
    }

    pub fn labels(&self) -> &[PremiumLabel] {
        &self.labels
    }
}
