pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod status;

pub use config::{Config, PremiumMode};
pub use datasource::{MockRegistrySource, RegistrySource, SourceError};
pub use domain::{
    ClId, Contact, Currency, CurrencyTable, Decimal, Domain, DomainGrandFathering, DomainName,
    ExpiryCondition, Fee, Host, Money, Phase, PhasePolicy, PhaseType, PremiumLabel, PremiumList,
    Price, Registrar, RegistrarStatus, TransactionType, FX,
};
pub use engine::{PricingEngine, Quote, QuoteError, QuoteFee, QuoteRequest};
pub use error::{ErrorKind, RegistryError};
pub use orchestration::QuoteService;
pub use status::{
    Action, ContactStatus, DomainStatus, HostStatus, ObjectType, PendingOp, StatusError,
    StatusSet, StatusToken,
};
