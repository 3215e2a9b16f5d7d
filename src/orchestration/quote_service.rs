use crate::datasource::{RegistrySource, SourceError};
use crate::domain::{Currency, Domain, PremiumLabel, TransactionType, FX};
use crate::engine::{PricingEngine, Quote, QuoteError, QuoteRequest};
use std::sync::Arc;

/// Resolves the records a quote depends on and prices it.
#[derive(Debug, Clone)]
pub struct QuoteService {
    source: Arc<dyn RegistrySource>,
    engine: PricingEngine,
}

impl QuoteService {
    pub fn new(source: Arc<dyn RegistrySource>, engine: PricingEngine) -> Self {
        Self { source, engine }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Quote `request` against the phase it names, or the current GA phase.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        request.validate(self.engine.config().max_horizon)?;
        let tld = request.domain_name.tld();

        let phase = match &request.phase_name {
            Some(name) => self.source.get_phase_by_name_and_tld(name, tld).await,
            None => self.source.get_current_ga_phase(tld, request.at).await,
        }
        .map_err(|err| match err {
            SourceError::NotFound(_) => QuoteError::PhaseNotFound {
                phase: request
                    .phase_name
                    .clone()
                    .unwrap_or_else(|| "current GA".to_string()),
                tld: tld.to_string(),
            },
            SourceError::Backend(msg) => QuoteError::Source(msg),
        })?;

        let domain = self.fetch_domain(request).await?;
        let premium = self.fetch_premium(&phase.premium_list_name, request).await?;

        let fx = if &request.currency != phase.base_currency() {
            self.fetch_fx(phase.base_currency(), request).await?
        } else {
            None
        };

        let quote = self
            .engine
            .get_quote(&phase, domain.as_ref(), fx.as_ref(), &premium, request)?;

        tracing::info!(
            domain = %quote.domain_name,
            transaction = %quote.transaction_type,
            phase = %quote.phase,
            amount = quote.price.amount,
            currency = %quote.price.currency,
            class = %quote.class,
            "quote computed"
        );
        Ok(quote)
    }

    async fn fetch_domain(&self, request: &QuoteRequest) -> Result<Option<Domain>, QuoteError> {
        match self.source.get_domain_by_name(&request.domain_name).await {
            Ok(domain) => Ok(Some(domain)),
            Err(SourceError::NotFound(_))
                if request.transaction_type == TransactionType::Registration =>
            {
                tracing::debug!(domain = %request.domain_name, "unregistered name, quoting registration");
                Ok(None)
            }
            Err(SourceError::NotFound(_)) => {
                Err(QuoteError::DomainNotFound(request.domain_name.to_string()))
            }
            Err(SourceError::Backend(msg)) => Err(QuoteError::Source(msg)),
        }
    }

    async fn fetch_premium(
        &self,
        list: &Option<String>,
        request: &QuoteRequest,
    ) -> Result<Vec<PremiumLabel>, QuoteError> {
        let Some(list) = list else {
            return Ok(Vec::new());
        };
        self.source
            .list_premium_entries_for_label(list, request.domain_name.label())
            .await
            .map_err(|err| QuoteError::Source(err.to_string()))
    }

    async fn fetch_fx(
        &self,
        base: &Currency,
        request: &QuoteRequest,
    ) -> Result<Option<FX>, QuoteError> {
        match self.source.get_fx_rate(base, &request.currency).await {
            Ok(fx) => Ok(Some(fx)),
            Err(SourceError::NotFound(_)) => {
                tracing::warn!(
                    from = %base,
                    to = %request.currency,
                    "no exchange rate available; quote fails if a conversion is needed"
                );
                Ok(None)
            }
            Err(SourceError::Backend(msg)) => Err(QuoteError::Source(msg)),
        }
    }
}
