//! Registry objects: domains, contacts, hosts and registrars.

use crate::domain::{ClId, DomainGrandFathering, DomainName, ExpiryCondition, TransactionType};
use crate::status::{Action, ContactStatus, DomainStatus, HostStatus, StatusError, StatusToken};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub name: DomainName,
    pub registrar: ClId,
    pub status: DomainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grandfathering: Option<DomainGrandFathering>,
}

impl Domain {
    pub fn new(name: DomainName, registrar: ClId) -> Self {
        Domain {
            name,
            registrar,
            status: DomainStatus::new(),
            grandfathering: None,
        }
    }

    pub fn with_grandfathering(mut self, grandfathering: DomainGrandFathering) -> Self {
        self.grandfathering = Some(grandfathering);
        self
    }

    pub fn set_status(&mut self, token: &str) -> Result<(), StatusError> {
        self.status.set_status(token)
    }

    pub fn unset_status(&mut self, token: &str) -> Result<(), StatusError> {
        self.status.unset_status(token)
    }

    /// No update prohibition and no pending operation. Status flags may still
    /// be toggled while something is pending; that only needs
    /// [`StatusSet::update_unlocked`](crate::status::StatusSet::update_unlocked).
    pub fn can_be_updated(&self) -> bool {
        self.status.allows(Action::Update)
    }

    pub fn can_be_deleted(&self) -> bool {
        self.status.allows(Action::Delete)
    }

    pub fn can_be_transferred(&self) -> bool {
        self.status.allows(Action::Transfer)
    }

    pub fn can_be_renewed(&self) -> bool {
        self.status.allows(Action::Renew)
    }

    /// Grandfathered pricing still in force at `at`.
    pub fn active_grandfathering(&self, at: DateTime<Utc>) -> Option<&DomainGrandFathering> {
        self.grandfathering.as_ref().filter(|gf| gf.is_active(at))
    }

    /// Drop the grandfathered price if `event` is its expiry condition.
    pub fn void_grandfathering_on(&mut self, event: ExpiryCondition) -> Option<DomainGrandFathering> {
        let matches = self
            .grandfathering
            .as_ref()
            .map_or(false, |gf| gf.expiry_condition == event);
        if matches {
            self.grandfathering.take()
        } else {
            None
        }
    }

    /// Record a completed transaction, voiding grandfathering it ends.
    pub fn complete_transaction(&mut self, transaction: TransactionType) {
        if self
            .grandfathering
            .as_ref()
            .map_or(false, |gf| gf.voided_by(transaction))
        {
            self.grandfathering = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ClId,
    pub registrar: ClId,
    pub status: ContactStatus,
}

impl Contact {
    pub fn new(id: ClId, registrar: ClId) -> Self {
        Contact {
            id,
            registrar,
            status: ContactStatus::new(),
        }
    }

    pub fn set_status(&mut self, token: &str) -> Result<(), StatusError> {
        self.status.set_status(token)
    }

    pub fn unset_status(&mut self, token: &str) -> Result<(), StatusError> {
        self.status.unset_status(token)
    }

    pub fn can_be_updated(&self) -> bool {
        self.status.allows(Action::Update)
    }

    pub fn can_be_transferred(&self) -> bool {
        self.status.allows(Action::Transfer)
    }

    /// Linked contacts are still referenced by a domain and cannot go away.
    pub fn can_be_deleted(&self) -> bool {
        self.status.allows(Action::Delete) && !self.status.has(StatusToken::Linked)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub name: DomainName,
    pub registrar: ClId,
    pub status: HostStatus,
}

impl Host {
    pub fn new(name: DomainName, registrar: ClId) -> Self {
        Host {
            name,
            registrar,
            status: HostStatus::new(),
        }
    }

    pub fn set_status(&mut self, token: &str) -> Result<(), StatusError> {
        self.status.set_status(token)
    }

    pub fn unset_status(&mut self, token: &str) -> Result<(), StatusError> {
        self.status.unset_status(token)
    }

    pub fn can_be_updated(&self) -> bool {
        self.status.allows(Action::Update)
    }

    /// Hosts used as nameservers of a domain cannot be deleted.
    pub fn can_be_deleted(&self) -> bool {
        self.status.allows(Action::Delete) && !self.status.has(StatusToken::Linked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrarError {
    #[error("registrar {0} is terminated")]
    Terminated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrarStatus {
    Ok,
    Readonly,
    Terminated,
}

impl fmt::Display for RegistrarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrarStatus::Ok => f.write_str("ok"),
            RegistrarStatus::Readonly => f.write_str("readonly"),
            RegistrarStatus::Terminated => f.write_str("terminated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrar {
    pub clid: ClId,
    pub name: String,
    pub status: RegistrarStatus,
}

impl Registrar {
    pub fn new(clid: ClId, name: impl Into<String>) -> Self {
        Registrar {
            clid,
            name: name.into(),
            status: RegistrarStatus::Ok,
        }
    }

    /// Change the registrar status. Termination is final.
    pub fn set_status(&mut self, status: RegistrarStatus) -> Result<(), RegistrarError> {
        if self.status == RegistrarStatus::Terminated && status != RegistrarStatus::Terminated {
            return Err(RegistrarError::Terminated(self.clid.to_string()));
        }
        self.status = status;
        Ok(())
    }

    pub fn can_transact(&self) -> bool {
        self.status == RegistrarStatus::Ok
    }
}
