use crate::config::ConfigError;
use crate::datasource::SourceError;
use crate::domain::{
    CurrencyError, GrandFatheringError, MoneyError, PhaseError, PremiumError, PrimitiveError,
    RegistrarError,
};
use crate::engine::{QuoteError, RequestError};
use crate::status::StatusError;
use thiserror::Error;

/// How a caller should react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; reject it.
    Validation,
    /// The object's current state forbids the operation.
    Policy,
    /// Dependent data is missing; may succeed once the data is fixed.
    Resolution,
    /// Arithmetic or backend failure.
    Internal,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Currency(#[from] CurrencyError),
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Premium(#[from] PremiumError),
    #[error(transparent)]
    GrandFathering(#[from] GrandFatheringError),
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
    #[error(transparent)]
    Registrar(#[from] RegistrarError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Status(StatusError::UnknownStatus { .. }) => ErrorKind::Validation,
            RegistryError::Status(_) => ErrorKind::Policy,
            RegistryError::Quote(err) => quote_kind(err),
            RegistryError::Request(_)
            | RegistryError::Currency(_)
            | RegistryError::Primitive(_)
            | RegistryError::GrandFathering(_)
            | RegistryError::Config(_) => ErrorKind::Validation,
            RegistryError::Money(MoneyError::Overflow) => ErrorKind::Internal,
            RegistryError::Money(_) => ErrorKind::Validation,
            RegistryError::Phase(
                PhaseError::PriceNotFound { .. } | PhaseError::FeeNotFound { .. },
            ) => ErrorKind::Resolution,
            RegistryError::Phase(_) => ErrorKind::Validation,
            RegistryError::Premium(PremiumError::LabelNotFound { .. }) => ErrorKind::Resolution,
            RegistryError::Premium(_) => ErrorKind::Validation,
            RegistryError::Registrar(_) => ErrorKind::Policy,
            RegistryError::Source(SourceError::NotFound(_)) => ErrorKind::Resolution,
            RegistryError::Source(SourceError::Backend(_)) => ErrorKind::Internal,
        }
    }

    /// True when retrying after the missing data is supplied may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Resolution
    }
}

fn quote_kind(err: &QuoteError) -> ErrorKind {
    match err {
        QuoteError::InvalidRequest(_)
        | QuoteError::InvalidPhaseName { .. }
        | QuoteError::InvalidDomainName { .. } => ErrorKind::Validation,
        QuoteError::MissingFxRate { .. }
        | QuoteError::PhaseNotFound { .. }
        | QuoteError::DomainNotFound(_)
        | QuoteError::PriceNotFound { .. } => ErrorKind::Resolution,
        QuoteError::Money(MoneyError::Overflow) => ErrorKind::Internal,
        QuoteError::Money(_) => ErrorKind::Validation,
        QuoteError::Source(_) => ErrorKind::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ObjectType, StatusToken};

    #[test]
    fn test_missing_fx_rate_is_retryable() {
        let err: RegistryError = QuoteError::MissingFxRate {
            from: "USD".to_string(),
            to: "EUR".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_policy_and_validation_are_not_retryable() {
        let err: RegistryError = StatusError::UpdateNotAllowed {
            object: ObjectType::Domain,
            token: StatusToken::ClientTransferProhibited,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Policy);
        assert!(!err.is_retryable());

        let err: RegistryError = StatusError::UnknownStatus {
            object: ObjectType::Host,
            token: "bogus".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_overflow_is_internal() {
        let err: RegistryError = QuoteError::Money(MoneyError::Overflow).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        let err: RegistryError = SourceError::Backend("down".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
