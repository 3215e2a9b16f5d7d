use super::policy::{ContactPolicy, DomainPolicy, HostPolicy, StatusPolicy};
use super::token::{Action, PendingOp, StatusToken};
use super::StatusError;
use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

pub type DomainStatus = StatusSet<DomainPolicy>;
pub type ContactStatus = StatusSet<ContactPolicy>;
pub type HostStatus = StatusSet<HostPolicy>;

/// Status flags of one object, validated against the legality table `P`.
///
/// At most one pending operation can be represented. `ok` is not stored: it
/// holds exactly when nothing is pending and every stored flag is one of
/// `P::OK_COMPANIONS`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusSet<P: StatusPolicy> {
    pending: Option<PendingOp>,
    flags: u32,
    _policy: PhantomData<P>,
}

impl<P: StatusPolicy> StatusSet<P> {
    /// The status of a newly created object.
    pub fn new() -> Self {
        let mut set = Self::empty();
        for token in P::INITIAL {
            if let Some(bit) = token.flag_bit() {
                set.flags |= 1 << bit;
            }
        }
        set
    }

    fn empty() -> Self {
        StatusSet {
            pending: None,
            flags: 0,
            _policy: PhantomData,
        }
    }

    /// Rebuild a set from its wire representation, validating it.
    ///
    /// `ok` may be omitted (it is re-derived) but may not be listed next to
    /// tokens that exclude it. An empty list is rejected.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, StatusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        let mut ok_listed = false;
        let mut seen_any = false;

        for raw in tokens {
            let token = Self::lookup(raw.as_ref())?;
            seen_any = true;
            if token == StatusToken::Ok {
                ok_listed = true;
            } else if let Some(op) = token.pending_op() {
                match set.pending {
                    Some(current) if current != op => {
                        return Err(Self::invalid(format!(
                            "{current} and {op} cannot both be pending"
                        )));
                    }
                    _ => set.pending = Some(op),
                }
            } else if let Some(bit) = token.flag_bit() {
                set.flags |= 1 << bit;
            }
        }

        if !seen_any {
            return Err(Self::invalid("status list must not be empty".to_string()));
        }
        if ok_listed && !set.is_ok() {
            let blocker = set
                .stored_tokens()
                .find(|t| !P::OK_COMPANIONS.contains(t))
                .map(|t| t.as_str())
                .unwrap_or("another status");
            return Err(Self::invalid(format!("ok cannot be combined with {blocker}")));
        }
        set.validate()?;
        Ok(set)
    }

    /// Set a status given by its wire spelling.
    pub fn set_status(&mut self, token: &str) -> Result<(), StatusError> {
        let token = Self::lookup(token)?;
        self.set(token)
    }

    /// Clear a status given by its wire spelling.
    pub fn unset_status(&mut self, token: &str) -> Result<(), StatusError> {
        let token = Self::lookup(token)?;
        self.unset(token)
    }

    /// Set `token`. On error the set is left unchanged.
    pub fn set(&mut self, token: StatusToken) -> Result<(), StatusError> {
        self.apply(token, true)
    }

    /// Clear `token`. On error the set is left unchanged.
    pub fn unset(&mut self, token: StatusToken) -> Result<(), StatusError> {
        self.apply(token, false)
    }

    fn apply(&mut self, token: StatusToken, on: bool) -> Result<(), StatusError> {
        if !P::allows(token) {
            return Err(Self::reject(StatusError::UnknownStatus {
                object: P::OBJECT,
                token: token.as_str().to_string(),
            }));
        }

        // An update prohibition can always be lifted or re-applied; anything
        // else has to wait until it is lifted.
        if !token.is_update_prohibition()
            && !P::UPDATE_LOCK_EXEMPT.contains(&token)
            && !self.update_unlocked()
        {
            return Err(Self::reject(StatusError::UpdateNotAllowed {
                object: P::OBJECT,
                token,
            }));
        }

        let mut next = *self;
        if token == StatusToken::Ok {
            if on != self.is_ok() {
                let reason = if on {
                    "ok cannot be set while other statuses are present"
                } else {
                    "ok cannot be cleared while no other status is present"
                };
                return Err(Self::reject(Self::invalid(reason.to_string())));
            }
        } else if let Some(op) = token.pending_op() {
            match (on, next.pending) {
                (true, Some(current)) if current != op => {
                    return Err(Self::reject(Self::invalid(format!(
                        "cannot set {op} while {current} is in progress"
                    ))));
                }
                (true, _) => next.pending = Some(op),
                (false, Some(current)) if current == op => next.pending = None,
                (false, _) => {}
            }
        } else if let Some(bit) = token.flag_bit() {
            if on {
                next.flags |= 1 << bit;
            } else {
                next.flags &= !(1 << bit);
            }
        }

        next.validate().map_err(Self::reject)?;
        *self = next;
        Ok(())
    }

    /// Check the set against the object type's legality table.
    ///
    /// Checks, in order: the set is not empty, every token belongs to the
    /// vocabulary, and no pending operation conflicts with a prohibition of
    /// the same action.
    pub fn validate(&self) -> Result<(), StatusError> {
        if self.tokens().is_empty() {
            return Err(Self::invalid("status set must not be empty".to_string()));
        }

        if let Some(stray) = self.tokens().into_iter().find(|t| !P::allows(*t)) {
            return Err(Self::invalid(format!("{stray} is not a {} status", P::OBJECT)));
        }

        if let Some(op) = self.pending {
            if let Some(action) = op.action() {
                if let Some(prohibition) = self.prohibition_for(action) {
                    return Err(Self::invalid(format!("{op} conflicts with {prohibition}")));
                }
            }
        }

        Ok(())
    }

    /// True when nothing is pending and only `ok`-compatible flags are stored.
    pub fn is_ok(&self) -> bool {
        self.pending.is_none() && self.stored_tokens().all(|t| P::OK_COMPANIONS.contains(&t))
    }

    pub fn has(&self, token: StatusToken) -> bool {
        if token == StatusToken::Ok {
            return self.is_ok();
        }
        if let Some(op) = token.pending_op() {
            return self.pending == Some(op);
        }
        token
            .flag_bit()
            .map_or(false, |bit| self.flags & (1 << bit) != 0)
    }

    pub fn pending(&self) -> Option<PendingOp> {
        self.pending
    }

    /// False while a client or server update prohibition is set. Pending
    /// operations are not considered; see [`StatusSet::allows`].
    pub fn update_unlocked(&self) -> bool {
        !self.has(StatusToken::ClientUpdateProhibited) && !self.has(StatusToken::ServerUpdateProhibited)
    }

    /// Whether `action` may start: no prohibition blocks it and nothing is pending.
    pub fn allows(&self, action: Action) -> bool {
        self.pending.is_none() && self.prohibition_for(action).is_none()
    }

    pub fn is_on_hold(&self) -> bool {
        self.has(StatusToken::ClientHold) || self.has(StatusToken::ServerHold)
    }

    /// Active tokens in canonical order, `ok` included when derived true.
    pub fn tokens(&self) -> Vec<StatusToken> {
        StatusToken::ALL
            .iter()
            .copied()
            .filter(|t| self.has(*t))
            .collect()
    }

    fn stored_tokens(&self) -> impl Iterator<Item = StatusToken> + '_ {
        StatusToken::ALL.iter().copied().filter(move |t| {
            t.flag_bit()
                .map_or(false, |bit| self.flags & (1 << bit) != 0)
        })
    }

    fn prohibition_for(&self, action: Action) -> Option<StatusToken> {
        self.stored_tokens().find(|t| t.blocks() == Some(action))
    }

    fn lookup(raw: &str) -> Result<StatusToken, StatusError> {
        StatusToken::parse(raw)
            .filter(|t| P::allows(*t))
            .ok_or_else(|| StatusError::UnknownStatus {
                object: P::OBJECT,
                token: raw.to_string(),
            })
    }

    fn invalid(reason: String) -> StatusError {
        StatusError::InvalidStatusCombination {
            object: P::OBJECT,
            reason,
        }
    }

    fn reject(err: StatusError) -> StatusError {
        let object = P::OBJECT;
        debug!(object = %object, error = %err, "status change rejected");
        err
    }
}

impl<P: StatusPolicy> Default for StatusSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: StatusPolicy> fmt::Debug for StatusSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tokens().iter().map(|t| t.as_str())).finish()
    }
}

impl<P: StatusPolicy> Serialize for StatusSet<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tokens = self.tokens();
        let mut seq = serializer.serialize_seq(Some(tokens.len()))?;
        for token in &tokens {
            seq.serialize_element(token.as_str())?;
        }
        seq.end()
    }
}

impl<'de, P: StatusPolicy> Deserialize<'de> for StatusSet<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        StatusSet::from_tokens(raw).map_err(serde::de::Error::custom)
    }
}
