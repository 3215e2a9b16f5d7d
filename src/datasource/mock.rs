//! In-memory registry source for tests and embedding without storage.

use super::{RegistrySource, SourceError};
use crate::domain::{Currency, Domain, DomainName, Phase, PremiumLabel, FX};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MockState {
    phases: Vec<Phase>,
    domains: HashMap<DomainName, Domain>,
    premium: Vec<PremiumLabel>,
    rates: Vec<FX>,
}

/// Registry source backed by in-memory records.
#[derive(Debug, Default)]
pub struct MockRegistrySource {
    state: RwLock<MockState>,
}

impl MockRegistrySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.state.get_mut().phases.push(phase);
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.state
            .get_mut()
            .domains
            .insert(domain.name.clone(), domain);
        self
    }

    pub fn with_premium_labels(mut self, labels: Vec<PremiumLabel>) -> Self {
        self.state.get_mut().premium.extend(labels);
        self
    }

    pub fn with_fx_rate(mut self, fx: FX) -> Self {
        self.state.get_mut().rates.push(fx);
        self
    }

    /// Add a rate after construction, e.g. to fix missing data between retries.
    pub async fn insert_fx_rate(&self, fx: FX) {
        self.state.write().await.rates.push(fx);
    }

    pub async fn upsert_domain(&self, domain: Domain) {
        self.state
            .write()
            .await
            .domains
            .insert(domain.name.clone(), domain);
    }
}

#[async_trait]
impl RegistrySource for MockRegistrySource {
    async fn get_phase_by_name_and_tld(
        &self,
        name: &str,
        tld: &str,
    ) -> Result<Phase, SourceError> {
        self.state
            .read()
            .await
            .phases
            .iter()
            .find(|p| p.name == name && p.tld == tld)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("phase {} for {}", name, tld)))
    }

    async fn get_current_ga_phase(
        &self,
        tld: &str,
        at: DateTime<Utc>,
    ) -> Result<Phase, SourceError> {
        self.state
            .read()
            .await
            .phases
            .iter()
            .find(|p| p.tld == tld && p.is_ga() && p.is_current(at))
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("current GA phase for {}", tld)))
    }

    async fn get_domain_by_name(&self, name: &DomainName) -> Result<Domain, SourceError> {
        self.state
            .read()
            .await
            .domains
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("domain {}", name)))
    }

    async fn list_premium_entries_for_label(
        &self,
        list: &str,
        label: &str,
    ) -> Result<Vec<PremiumLabel>, SourceError> {
        Ok(self
            .state
            .read()
            .await
            .premium
            .iter()
            .filter(|l| l.premium_list_name == list && l.label == label)
            .cloned()
            .collect())
    }

    async fn get_fx_rate(&self, base: &Currency, target: &Currency) -> Result<FX, SourceError> {
        self.state
            .read()
            .await
            .rates
            .iter()
            .filter(|fx| &fx.from == base && &fx.to == target)
            .max_by_key(|fx| fx.date)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("rate {} to {}", base, target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClId, CurrencyTable, Decimal, PhasePolicy, PhaseType};
    use chrono::{Duration, TimeZone};

    fn cur(code: &str) -> Currency {
        Currency::parse(code, &CurrencyTable::iso4217()).unwrap()
    }

    fn rate(days: i64, r: &str) -> FX {
        FX::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days),
            cur("USD"),
            cur("EUR"),
            Decimal::from_str_canonical(r).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_fx_rate_wins() {
        let source = MockRegistrySource::new()
            .with_fx_rate(rate(0, "0.90"))
            .with_fx_rate(rate(5, "0.92"));
        source.insert_fx_rate(rate(2, "0.91")).await;

        let fx = source.get_fx_rate(&cur("USD"), &cur("EUR")).await.unwrap();
        assert_eq!(fx.rate, Decimal::from_str_canonical("0.92").unwrap());
        assert!(matches!(
            source.get_fx_rate(&cur("EUR"), &cur("USD")).await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_current_ga_phase_lookup() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let policy = PhasePolicy::new(cur("USD"), 10).unwrap();
        let sunrise = Phase::new("sunrise", "tld", PhaseType::Launch, start, policy.clone()).unwrap();
        let ga = Phase::new("GA", "tld", PhaseType::GA, start, policy).unwrap();
        let source = MockRegistrySource::new().with_phase(sunrise).with_phase(ga);

        let found = source
            .get_current_ga_phase("tld", start + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(found.name, "GA");
        assert!(source
            .get_current_ga_phase("other", start)
            .await
            .is_err());
        assert!(source
            .get_phase_by_name_and_tld("sunrise", "tld")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_domain_lookup() {
        let name = DomainName::parse("example.tld").unwrap();
        let source = MockRegistrySource::new();
        assert!(source.get_domain_by_name(&name).await.is_err());
        source
            .upsert_domain(Domain::new(name.clone(), ClId::parse("registrar1").unwrap()))
            .await;
        assert_eq!(source.get_domain_by_name(&name).await.unwrap().name, name);
    }
}
