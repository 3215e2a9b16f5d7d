//! Read-only access to the registry records the pricing engine depends on.

use crate::domain::{Currency, Domain, DomainName, Phase, PremiumLabel, FX};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

pub mod mock;

pub use mock::MockRegistrySource;

/// Fetches phases, domains, premium rows and exchange rates.
///
/// Implementations own persistence, timeouts and retries; the engine only
/// sees the records or a [`SourceError`].
#[async_trait]
pub trait RegistrySource: Send + Sync + fmt::Debug {
    /// Fetch a phase of `tld` by name.
    async fn get_phase_by_name_and_tld(&self, name: &str, tld: &str)
        -> Result<Phase, SourceError>;

    /// Fetch the GA phase of `tld` open at `at`.
    async fn get_current_ga_phase(&self, tld: &str, at: DateTime<Utc>)
        -> Result<Phase, SourceError>;

    async fn get_domain_by_name(&self, name: &DomainName) -> Result<Domain, SourceError>;

    /// Every row of premium list `list` for `label`, any currency.
    async fn list_premium_entries_for_label(
        &self,
        list: &str,
        label: &str,
    ) -> Result<Vec<PremiumLabel>, SourceError>;

    /// The most recent rate converting `base` into `target`.
    async fn get_fx_rate(&self, base: &Currency, target: &Currency) -> Result<FX, SourceError>;
}

/// Error type for registry source operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The requested record does not exist.
    NotFound(String),
    /// Storage or transport failure.
    Backend(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(what) => write!(f, "Not found: {}", what),
            SourceError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}
