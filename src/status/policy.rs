//! Per-object legality tables driving the generic status engine.

use super::token::StatusToken;
use super::ObjectType;
use std::fmt;
use std::hash::Hash;

use StatusToken::*;

/// Static legality table of one object type.
pub trait StatusPolicy: fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + Send + Sync + 'static {
    const OBJECT: ObjectType;
    /// Tokens the object type may carry, `ok` included.
    const VOCABULARY: &'static [StatusToken];
    /// Stored tokens of a freshly created object.
    const INITIAL: &'static [StatusToken];
    /// Flags that may accompany `ok`. Any other stored flag, or a pending
    /// operation, clears it.
    const OK_COMPANIONS: &'static [StatusToken];
    /// Tokens that may still be toggled while an update prohibition is set.
    const UPDATE_LOCK_EXEMPT: &'static [StatusToken];

    fn allows(token: StatusToken) -> bool {
        Self::VOCABULARY.contains(&token)
    }
}

/// RFC 5731 domain statuses.
///
/// `inactive` is a baseline of its own: a domain without delegation is never
/// `ok`, and a new domain starts out `inactive` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DomainPolicy;

impl StatusPolicy for DomainPolicy {
    const OBJECT: ObjectType = ObjectType::Domain;
    const VOCABULARY: &'static [StatusToken] = &[
        Ok,
        Inactive,
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
    ];
    const INITIAL: &'static [StatusToken] = &[Inactive];
    const OK_COMPANIONS: &'static [StatusToken] = &[];
    const UPDATE_LOCK_EXEMPT: &'static [StatusToken] = &[];
}

/// RFC 5733 contact statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContactPolicy;

impl StatusPolicy for ContactPolicy {
    const OBJECT: ObjectType = ObjectType::Contact;
    const VOCABULARY: &'static [StatusToken] = &[
        Ok,
        Linked,
        ClientTransferProhibited,
        ClientUpdateProhibited,
        ClientDeleteProhibited,
        ServerTransferProhibited,
        ServerUpdateProhibited,
        ServerDeleteProhibited,
        PendingCreate,
        PendingTransfer,
        PendingUpdate,
        PendingRestore,
        PendingDelete,
    ];
    const INITIAL: &'static [StatusToken] = &[];
    const OK_COMPANIONS: &'static [StatusToken] = &[Linked];
    // Linking a contact to a domain must work on locked contacts.
    const UPDATE_LOCK_EXEMPT: &'static [StatusToken] = &[Linked];
}

/// RFC 5732 host statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HostPolicy;

impl StatusPolicy for HostPolicy {
    const OBJECT: ObjectType = ObjectType::Host;
    const VOCABULARY: &'static [StatusToken] = &[
        Ok,
        Linked,
        ClientTransferProhibited,
        ClientUpdateProhibited,
        ClientDeleteProhibited,
        ServerTransferProhibited,
        ServerUpdateProhibited,
        ServerDeleteProhibited,
        PendingCreate,
        PendingTransfer,
        PendingUpdate,
        PendingDelete,
    ];
    const INITIAL: &'static [StatusToken] = &[];
    const OK_COMPANIONS: &'static [StatusToken] = &[Linked];
    const UPDATE_LOCK_EXEMPT: &'static [StatusToken] = &[];
}
