//! Object status policy engine.
//!
//! A [`StatusSet`] holds the RFC 5731/5732/5733 status flags of one registry
//! object. The pending operation is a single optional value, prohibitions and
//! relationships are independent flags, and `ok` is derived on read. Every
//! mutation goes through [`StatusSet::set`] / [`StatusSet::unset`], which
//! enforce the update lockout and the object type's legality table.

pub mod policy;
pub mod set;
pub mod token;

pub use policy::{ContactPolicy, DomainPolicy, HostPolicy, StatusPolicy};
pub use set::{ContactStatus, DomainStatus, HostStatus, StatusSet};
pub use token::{Action, PendingOp, StatusCategory, StatusToken};

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Registry object kinds carrying a status set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Domain,
    Contact,
    Host,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Domain => f.write_str("domain"),
            ObjectType::Contact => f.write_str("contact"),
            ObjectType::Host => f.write_str("host"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("unknown {object} status {token:?}")]
    UnknownStatus { object: ObjectType, token: String },
    #[error("invalid {object} status combination: {reason}")]
    InvalidStatusCombination { object: ObjectType, reason: String },
    #[error("{object} update not allowed: cannot change {token} while an update prohibition is set")]
    UpdateNotAllowed {
        object: ObjectType,
        token: StatusToken,
    },
}
