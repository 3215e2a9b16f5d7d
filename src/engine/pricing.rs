use super::quote::{Quote, QuoteRequest, RequestError};
use super::QuoteError;
use crate::config::{Config, PremiumMode};
use crate::domain::{Domain, Fee, Phase, PremiumLabel, TransactionType, FX};
use tracing::{debug, warn};

pub const GRANDFATHERING_FEE: &str = "GrandFathering";
pub const PREMIUM_FEE: &str = "premium fee";

/// Resolves the price of a domain operation.
///
/// Precedence: phase fees are always charged; then grandfathered renewal
/// pricing, then premium-list pricing, then the phase's standard price.
/// The engine performs no I/O and holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: Config,
}

impl PricingEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Price `request` against the supplied phase, domain, rate and premium rows.
    ///
    /// `domain` is `None` for names that are not registered yet. `fx` must
    /// convert from whatever currency a charge is priced in to the requested
    /// currency; it is only consulted when a conversion is needed.
    pub fn get_quote(
        &self,
        phase: &Phase,
        domain: Option<&Domain>,
        fx: Option<&FX>,
        premium_entries: &[PremiumLabel],
        request: &QuoteRequest,
    ) -> Result<Quote, QuoteError> {
        request.validate(self.config.max_horizon)?;
        if request.years > phase.policy.max_horizon {
            return Err(RequestError::YearsOutOfRange {
                years: request.years,
                max: phase.policy.max_horizon,
            }
            .into());
        }
        self.check_phase(phase, request)?;
        if let Some(domain) = domain {
            if domain.name != request.domain_name {
                return Err(QuoteError::InvalidDomainName {
                    expected: request.domain_name.to_string(),
                    found: domain.name.to_string(),
                });
            }
        }

        let mut quote = Quote::new(request, phase);
        let years = request.years;
        let transaction = request.transaction_type;

        self.apply_phase_fees(phase, fx, &mut quote)?;

        if transaction == TransactionType::Renewal {
            if let Some(gf) = domain.and_then(|d| d.active_grandfathering(request.at)) {
                let total = gf.money().checked_mul(years)?;
                quote.record(GRANDFATHERING_FEE, &total, false);
                quote.charge(&total, fx)?;
                debug!(domain = %request.domain_name, amount = total.amount, currency = %total.currency, "grandfathered renewal");
                return Ok(quote);
            }
        }

        let matches = premium_matches(phase, premium_entries, request);
        if !matches.is_empty() {
            let selected: Vec<&PremiumLabel> = match self.config.premium_mode {
                PremiumMode::Single => select_premium(&matches, phase, request)
                    .into_iter()
                    .collect(),
                PremiumMode::Accumulate => matches,
            };
            for entry in selected {
                let total = entry.money_for(transaction).checked_mul(years)?;
                quote.record(PREMIUM_FEE, &total, false);
                quote.charge(&total, fx)?;
                quote.class = entry.class.clone();
            }
            debug!(domain = %request.domain_name, class = %quote.class, "premium pricing applied");
            return Ok(quote);
        }

        if phase.prices().is_empty() {
            debug!(phase = %phase.name, "phase has no prices, quoting fees only");
            return Ok(quote);
        }

        let price = phase
            .price_for(&request.currency)
            .or_else(|| phase.base_price())
            .ok_or_else(|| QuoteError::PriceNotFound {
                phase: phase.name.clone(),
                currency: request.currency.to_string(),
            })?;
        let total = price.money_for(transaction).checked_mul(years)?;
        quote.record(&transaction.fee_name(), &total, false);
        quote.charge(&total, fx)?;
        debug!(domain = %request.domain_name, phase = %phase.name, currency = %total.currency, "standard pricing applied");
        Ok(quote)
    }

    fn check_phase(&self, phase: &Phase, request: &QuoteRequest) -> Result<(), QuoteError> {
        match &request.phase_name {
            Some(name) if name != &phase.name => Err(QuoteError::InvalidPhaseName {
                expected: name.clone(),
                found: phase.name.clone(),
            }),
            None if !(phase.is_ga() && phase.is_current(request.at)) => {
                Err(QuoteError::InvalidPhaseName {
                    expected: "current GA phase".to_string(),
                    found: phase.name.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Charge every phase fee: those in the requested currency when any exist,
    /// otherwise the base-currency ones, converted.
    fn apply_phase_fees(
        &self,
        phase: &Phase,
        fx: Option<&FX>,
        quote: &mut Quote,
    ) -> Result<(), QuoteError> {
        let currency = quote.price.currency.clone();
        let mut fees: Vec<&Fee> = phase.fees_for(&currency).collect();
        if fees.is_empty() {
            fees = phase.fees_for(phase.base_currency()).collect();
        }
        if fees.is_empty() && !phase.fees().is_empty() {
            warn!(
                phase = %phase.name,
                currency = %currency,
                "phase fees exist only in currencies other than the requested and base currency; none charged"
            );
        }
        for fee in fees {
            let money = fee.money();
            quote.record(&fee.name, &money, fee.refundable);
            quote.charge(&money, fx)?;
        }
        Ok(())
    }
}

/// Rows of the phase's premium list priced for the requested label.
fn premium_matches<'a>(
    phase: &Phase,
    entries: &'a [PremiumLabel],
    request: &QuoteRequest,
) -> Vec<&'a PremiumLabel> {
    let Some(list) = phase.premium_list_name.as_deref() else {
        return Vec::new();
    };
    let label = request.domain_name.label();
    entries
        .iter()
        .filter(|e| e.premium_list_name == list && e.label == label)
        .collect()
}

fn select_premium<'a>(
    matches: &[&'a PremiumLabel],
    phase: &Phase,
    request: &QuoteRequest,
) -> Option<&'a PremiumLabel> {
    matches
        .iter()
        .find(|e| e.currency == request.currency)
        .or_else(|| matches.iter().find(|e| &e.currency == phase.base_currency()))
        .or_else(|| matches.first())
        .copied()
}
