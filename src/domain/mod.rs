//! Domain types for the registry core.
//!
//! This module provides:
//! - Lossless rate arithmetic via the Decimal wrapper
//! - Primitives: DomainName, ClId, TransactionType
//! - Currency validation against an injected table, Money, Price, Fee and FX
//! - Sales phases, premium lists and grandfathered pricing
//! - Registry objects carrying status sets

pub mod currency;
pub mod decimal;
pub mod fx;
pub mod grandfathering;
pub mod money;
pub mod object;
pub mod phase;
pub mod premium;
pub mod primitives;

pub use currency::{Currency, CurrencyError, CurrencyTable};
pub use decimal::Decimal;
pub use fx::FX;
pub use grandfathering::{DomainGrandFathering, ExpiryCondition, GrandFatheringError};
pub use money::{Fee, Money, MoneyError, Price};
pub use object::{Contact, Domain, Host, Registrar, RegistrarError, RegistrarStatus};
pub use phase::{Phase, PhaseError, PhasePolicy, PhaseType};
pub use premium::{PremiumError, PremiumLabel, PremiumList};
pub use primitives::{ClId, DomainName, PrimitiveError, TransactionType};
