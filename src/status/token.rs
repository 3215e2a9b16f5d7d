//! Status token vocabulary shared by domains, contacts and hosts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every status token any registry object can carry, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusToken {
    Ok,
    Inactive,
    Linked,
    ClientTransferProhibited,
    ClientUpdateProhibited,
    ClientDeleteProhibited,
    ClientRenewProhibited,
    ClientHold,
    ServerTransferProhibited,
    ServerUpdateProhibited,
    ServerDeleteProhibited,
    ServerRenewProhibited,
    ServerHold,
    PendingCreate,
    PendingRenew,
    PendingTransfer,
    PendingUpdate,
    PendingRestore,
    PendingDelete,
}

/// Category a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Baseline,
    Pending,
    ClientProhibition,
    ServerProhibition,
    Relationship,
}

/// A mutation a prohibition blocks or a pending operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Transfer,
    Update,
    Delete,
    Renew,
}

/// The single in-flight operation of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PendingOp {
    Create,
    Renew,
    Transfer,
    Update,
    Restore,
    Delete,
}

impl PendingOp {
    pub fn token(self) -> StatusToken {
        match self {
            PendingOp::Create => StatusToken::PendingCreate,
            PendingOp::Renew => StatusToken::PendingRenew,
            PendingOp::Transfer => StatusToken::PendingTransfer,
            PendingOp::Update => StatusToken::PendingUpdate,
            PendingOp::Restore => StatusToken::PendingRestore,
            PendingOp::Delete => StatusToken::PendingDelete,
        }
    }

    /// The action whose prohibition cannot coexist with this pending operation.
    pub fn action(self) -> Option<Action> {
        match self {
            PendingOp::Renew => Some(Action::Renew),
            PendingOp::Transfer => Some(Action::Transfer),
            PendingOp::Update => Some(Action::Update),
            PendingOp::Delete => Some(Action::Delete),
            PendingOp::Create | PendingOp::Restore => None,
        }
    }
}

impl fmt::Display for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().as_str())
    }
}

impl StatusToken {
    pub const ALL: [StatusToken; 19] = [
        StatusToken::Ok,
        StatusToken::Inactive,
        StatusToken::Linked,
        StatusToken::ClientTransferProhibited,
        StatusToken::ClientUpdateProhibited,
        StatusToken::ClientDeleteProhibited,
        StatusToken::ClientRenewProhibited,
        StatusToken::ClientHold,
        StatusToken::ServerTransferProhibited,
        StatusToken::ServerUpdateProhibited,
        StatusToken::ServerDeleteProhibited,
        StatusToken::ServerRenewProhibited,
        StatusToken::ServerHold,
        StatusToken::PendingCreate,
        StatusToken::PendingRenew,
        StatusToken::PendingTransfer,
        StatusToken::PendingUpdate,
        StatusToken::PendingRestore,
        StatusToken::PendingDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusToken::Ok => "ok",
            StatusToken::Inactive => "inactive",
            StatusToken::Linked => "linked",
            StatusToken::ClientTransferProhibited => "clientTransferProhibited",
            StatusToken::ClientUpdateProhibited => "clientUpdateProhibited",
            StatusToken::ClientDeleteProhibited => "clientDeleteProhibited",
            StatusToken::ClientRenewProhibited => "clientRenewProhibited",
            StatusToken::ClientHold => "clientHold",
            StatusToken::ServerTransferProhibited => "serverTransferProhibited",
            StatusToken::ServerUpdateProhibited => "serverUpdateProhibited",
            StatusToken::ServerDeleteProhibited => "serverDeleteProhibited",
            StatusToken::ServerRenewProhibited => "serverRenewProhibited",
            StatusToken::ServerHold => "serverHold",
            StatusToken::PendingCreate => "pendingCreate",
            StatusToken::PendingRenew => "pendingRenew",
            StatusToken::PendingTransfer => "pendingTransfer",
            StatusToken::PendingUpdate => "pendingUpdate",
            StatusToken::PendingRestore => "pendingRestore",
            StatusToken::PendingDelete => "pendingDelete",
        }
    }

    /// Look up a token by its wire spelling. Matching is case-sensitive.
    pub fn parse(s: &str) -> Option<StatusToken> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    pub fn category(&self) -> StatusCategory {
        use StatusToken::*;
        match self {
            Ok | Inactive => StatusCategory::Baseline,
            Linked => StatusCategory::Relationship,
            ClientTransferProhibited | ClientUpdateProhibited | ClientDeleteProhibited
            | ClientRenewProhibited | ClientHold => StatusCategory::ClientProhibition,
            ServerTransferProhibited | ServerUpdateProhibited | ServerDeleteProhibited
            | ServerRenewProhibited | ServerHold => StatusCategory::ServerProhibition,
            PendingCreate | PendingRenew | PendingTransfer | PendingUpdate | PendingRestore
            | PendingDelete => StatusCategory::Pending,
        }
    }

    pub fn pending_op(&self) -> Option<PendingOp> {
        match self {
            StatusToken::PendingCreate => Some(PendingOp::Create),
            StatusToken::PendingRenew => Some(PendingOp::Renew),
            StatusToken::PendingTransfer => Some(PendingOp::Transfer),
            StatusToken::PendingUpdate => Some(PendingOp::Update),
            StatusToken::PendingRestore => Some(PendingOp::Restore),
            StatusToken::PendingDelete => Some(PendingOp::Delete),
            _ => None,
        }
    }

    /// The action a prohibition token blocks. Holds block resolution, not an action.
    pub fn blocks(&self) -> Option<Action> {
        use StatusToken::*;
        match self {
            ClientTransferProhibited | ServerTransferProhibited => Some(Action::Transfer),
            ClientUpdateProhibited | ServerUpdateProhibited => Some(Action::Update),
            ClientDeleteProhibited | ServerDeleteProhibited => Some(Action::Delete),
            ClientRenewProhibited | ServerRenewProhibited => Some(Action::Renew),
            _ => None,
        }
    }

    pub fn is_update_prohibition(&self) -> bool {
        self.blocks() == Some(Action::Update)
    }

    /// Bit position in the flag set, for tokens that are stored as independent flags.
    pub(crate) fn flag_bit(&self) -> Option<u32> {
        match self.category() {
            StatusCategory::Pending => None,
            _ if *self == StatusToken::Ok => None,
            _ => Some(*self as u32),
        }
    }
}

impl fmt::Display for StatusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
