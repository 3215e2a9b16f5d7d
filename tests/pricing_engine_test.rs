use chrono::{DateTime, Duration, TimeZone, Utc};
use registry_core::engine::{RequestError, GRANDFATHERING_FEE, PREMIUM_FEE, STANDARD_CLASS};
use registry_core::{
    ClId, Config, Currency, CurrencyTable, Decimal, Domain, DomainGrandFathering, DomainName,
    ExpiryCondition, Fee, Phase, PhasePolicy, PhaseType, PremiumLabel, PremiumMode, Price,
    PricingEngine, QuoteError, QuoteRequest, FX,
};
use std::io;
use std::sync::{Arc, Mutex};

const PREMIUM_LIST: &str = "tld-premium";

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    start() + Duration::days(30)
}

fn cur(code: &str) -> Currency {
    Currency::parse(code, &CurrencyTable::iso4217()).unwrap()
}

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn usd_to_eur() -> FX {
    FX::new(start(), cur("USD"), cur("EUR"), d("0.90")).unwrap()
}

fn ga_phase() -> Phase {
    let mut phase = Phase::new(
        "GA",
        "tld",
        PhaseType::GA,
        start(),
        PhasePolicy::new(cur("USD"), 10).unwrap(),
    )
    .unwrap();
    phase
        .add_price(Price::new(cur("USD"), 1000, 1000, 1000, 5000))
        .unwrap();
    phase
}

fn premium_phase() -> Phase {
    ga_phase().with_premium_list(PREMIUM_LIST)
}

fn premium_row(currency: &str, amount: u64) -> PremiumLabel {
    PremiumLabel::new(
        "example",
        amount,
        amount,
        amount,
        amount,
        cur(currency),
        "premium",
        PREMIUM_LIST,
    )
    .unwrap()
}

fn request(tt: &str, currency: &str, years: u32) -> QuoteRequest {
    QuoteRequest::parse(
        "example.tld",
        tt,
        currency,
        years,
        "registrar1",
        &CurrencyTable::iso4217(),
    )
    .unwrap()
    .at(now())
}

fn domain() -> Domain {
    Domain::new(
        DomainName::parse("example.tld").unwrap(),
        ClId::parse("registrar1").unwrap(),
    )
}

fn engine() -> PricingEngine {
    PricingEngine::new(Config::default())
}

/// Collects formatted log output so tests can assert on emitted warnings.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// =============================================================================
// Standard pricing
// =============================================================================

#[test]
fn test_standard_registration_in_base_currency() {
    let quote = engine()
        .get_quote(&ga_phase(), None, None, &[], &request("registration", "USD", 2))
        .unwrap();

    assert_eq!(quote.price.amount, 2000);
    assert_eq!(quote.price.currency, cur("USD"));
    assert_eq!(quote.fees.len(), 1);
    assert_eq!(quote.fees[0].name, "registration fee");
    assert_eq!(quote.fees[0].amount, 2000);
    assert!(!quote.fees[0].refundable);
    assert_eq!(quote.class, STANDARD_CLASS);
    assert_eq!(quote.phase, "GA");
    assert_eq!(quote.timestamp, now());
    assert!(quote.fx_rate.is_none());
}

#[test]
fn test_base_price_converted_to_requested_currency() {
    let fx = usd_to_eur();
    let quote = engine()
        .get_quote(&ga_phase(), None, Some(&fx), &[], &request("registration", "EUR", 2))
        .unwrap();

    assert_eq!(quote.price.amount, 1800);
    assert_eq!(quote.price.currency, cur("EUR"));
    assert_eq!(quote.fees[0].amount, 2000);
    assert_eq!(quote.fees[0].currency, cur("USD"));
    assert_eq!(quote.fx_rate, Some(fx));
}

#[test]
fn test_requested_currency_price_needs_no_rate() {
    let mut phase = ga_phase();
    phase
        .add_price(Price::new(cur("EUR"), 950, 950, 950, 4500))
        .unwrap();

    let quote = engine()
        .get_quote(&phase, None, None, &[], &request("registration", "EUR", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 950);
    assert!(quote.fx_rate.is_none());
}

#[test]
fn test_missing_fx_rate() {
    let err = engine()
        .get_quote(&ga_phase(), None, None, &[], &request("registration", "EUR", 1))
        .unwrap_err();
    assert_eq!(
        err,
        QuoteError::MissingFxRate {
            from: "USD".to_string(),
            to: "EUR".to_string()
        }
    );
}

#[test]
fn test_restore_uses_restore_amount() {
    let quote = engine()
        .get_quote(&ga_phase(), Some(&domain()), None, &[], &request("restore", "USD", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 5000);
    assert_eq!(quote.fees[0].name, "restore fee");
}

// =============================================================================
// Phase fees
// =============================================================================

#[test]
fn test_phase_fees_are_always_charged() {
    let mut phase = ga_phase();
    phase
        .add_fee(Fee::new(cur("USD"), "application fee", 500, true).unwrap())
        .unwrap();

    let quote = engine()
        .get_quote(&phase, None, None, &[], &request("registration", "USD", 2))
        .unwrap();
    assert_eq!(quote.price.amount, 2500);
    assert_eq!(quote.fees.len(), 2);
    assert_eq!(quote.fees[0].name, "application fee");
    assert!(quote.fees[0].refundable);
    assert_eq!(quote.fees_total(&cur("USD")), 2500);
}

#[test]
fn test_fees_only_quote_when_phase_has_no_prices() {
    let mut phase = Phase::new(
        "landrush",
        "tld",
        PhaseType::Launch,
        start(),
        PhasePolicy::new(cur("USD"), 10).unwrap(),
    )
    .unwrap();
    phase
        .add_fee(Fee::new(cur("USD"), "application fee", 300, false).unwrap())
        .unwrap();

    let quote = engine()
        .get_quote(
            &phase,
            None,
            None,
            &[],
            &request("registration", "USD", 1).with_phase("landrush"),
        )
        .unwrap();
    assert_eq!(quote.price.amount, 300);
    assert_eq!(quote.fees.len(), 1);
}

#[test]
fn test_price_not_found_when_no_usable_currency() {
    let mut phase = Phase::new(
        "GA",
        "tld",
        PhaseType::GA,
        start(),
        PhasePolicy::new(cur("USD"), 10).unwrap(),
    )
    .unwrap();
    phase
        .add_price(Price::new(cur("GBP"), 800, 800, 800, 4000))
        .unwrap();

    let fx = usd_to_eur();
    let err = engine()
        .get_quote(&phase, None, Some(&fx), &[], &request("registration", "EUR", 1))
        .unwrap_err();
    assert_eq!(
        err,
        QuoteError::PriceNotFound {
            phase: "GA".to_string(),
            currency: "EUR".to_string()
        }
    );
}

#[test]
fn test_base_currency_fees_converted_for_foreign_request() {
    let mut phase = ga_phase();
    phase
        .add_fee(Fee::new(cur("USD"), "application fee", 500, false).unwrap())
        .unwrap();

    let fx = usd_to_eur();
    let quote = engine()
        .get_quote(&phase, None, Some(&fx), &[], &request("registration", "EUR", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 1350);
    assert_eq!(quote.price.currency, cur("EUR"));
    assert_eq!(quote.fees[0].name, "application fee");
    assert_eq!(quote.fees[0].amount, 500);
    assert_eq!(quote.fees[0].currency, cur("USD"));
    assert_eq!(quote.fees_total(&cur("USD")), 1500);
}

#[test]
fn test_requested_currency_fees_take_priority_over_base() {
    let mut phase = ga_phase();
    phase
        .add_fee(Fee::new(cur("USD"), "application fee", 500, false).unwrap())
        .unwrap();
    phase
        .add_fee(Fee::new(cur("EUR"), "application fee", 400, false).unwrap())
        .unwrap();

    let fx = usd_to_eur();
    let quote = engine()
        .get_quote(&phase, None, Some(&fx), &[], &request("registration", "EUR", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 1300);
    assert_eq!(quote.fees.len(), 2);
    assert_eq!(quote.fees[0].amount, 400);
    assert_eq!(quote.fees[0].currency, cur("EUR"));
    assert_eq!(quote.fees_total(&cur("USD")), 1000);
}

#[test]
fn test_fees_in_unrelated_currency_skipped_with_warning() {
    let mut phase = ga_phase();
    phase
        .add_fee(Fee::new(cur("GBP"), "application fee", 700, false).unwrap())
        .unwrap();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let quote = tracing::subscriber::with_default(subscriber, || {
        engine().get_quote(&phase, None, None, &[], &request("registration", "USD", 1))
    })
    .unwrap();

    assert_eq!(quote.price.amount, 1000);
    assert_eq!(quote.fees.len(), 1);
    assert_eq!(quote.fees[0].name, "registration fee");
    let output = logs.contents();
    assert!(output.contains("WARN"), "no warning in {output:?}");
    assert!(output.contains("phase fees exist only in currencies other than"));
}

// =============================================================================
// Grandfathering and premium precedence
// =============================================================================

#[test]
fn test_grandfathering_beats_premium_and_standard() {
    let gf = DomainGrandFathering::new(800, cur("USD"), ExpiryCondition::Transfer, None).unwrap();
    let domain = domain().with_grandfathering(gf);
    let rows = [premium_row("USD", 10000)];

    let quote = engine()
        .get_quote(&premium_phase(), Some(&domain), None, &rows, &request("renewal", "USD", 2))
        .unwrap();
    assert_eq!(quote.price.amount, 1600);
    assert_eq!(quote.fees[0].name, GRANDFATHERING_FEE);
    assert_eq!(quote.class, STANDARD_CLASS);
}

#[test]
fn test_grandfathered_amount_converted_to_requested_currency() {
    let gf = DomainGrandFathering::new(800, cur("USD"), ExpiryCondition::Transfer, None).unwrap();
    let domain = domain().with_grandfathering(gf);
    let fx = usd_to_eur();

    let quote = engine()
        .get_quote(&ga_phase(), Some(&domain), Some(&fx), &[], &request("renewal", "EUR", 2))
        .unwrap();
    assert_eq!(quote.price.amount, 1440);
    assert_eq!(quote.price.currency, cur("EUR"));
    assert_eq!(quote.fees.len(), 1);
    assert_eq!(quote.fees[0].name, GRANDFATHERING_FEE);
    assert_eq!(quote.fees[0].amount, 1600);
    assert_eq!(quote.fees[0].currency, cur("USD"));
    assert_eq!(quote.fx_rate, Some(fx));
}

#[test]
fn test_grandfathering_only_applies_to_renewals() {
    let gf = DomainGrandFathering::new(800, cur("USD"), ExpiryCondition::Transfer, None).unwrap();
    let domain = domain().with_grandfathering(gf);

    let quote = engine()
        .get_quote(&ga_phase(), Some(&domain), None, &[], &request("transfer", "USD", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 1000);
    assert_eq!(quote.fees[0].name, "transfer fee");
}

#[test]
fn test_expired_grandfathering_falls_back_to_premium() {
    let gf = DomainGrandFathering::new(
        800,
        cur("USD"),
        ExpiryCondition::Date,
        Some(start() + Duration::days(1)),
    )
    .unwrap();
    let domain = domain().with_grandfathering(gf);
    let rows = [premium_row("USD", 10000)];

    let quote = engine()
        .get_quote(&premium_phase(), Some(&domain), None, &rows, &request("renewal", "USD", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 10000);
    assert_eq!(quote.fees[0].name, PREMIUM_FEE);
    assert_eq!(quote.class, "premium");
}

#[test]
fn test_premium_rows_ignored_without_premium_list() {
    let rows = [premium_row("USD", 10000)];
    let quote = engine()
        .get_quote(&ga_phase(), None, None, &rows, &request("registration", "USD", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 1000);
    assert_eq!(quote.class, STANDARD_CLASS);
}

#[test]
fn test_single_premium_row_prefers_requested_currency() {
    let fx = usd_to_eur();
    let rows = [premium_row("USD", 10000), premium_row("EUR", 9500)];

    let quote = engine()
        .get_quote(&premium_phase(), None, Some(&fx), &rows, &request("registration", "EUR", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 9500);
    assert_eq!(quote.fees.len(), 1);
    assert!(quote.fx_rate.is_none());
}

#[test]
fn test_single_premium_row_converts_base_currency() {
    let fx = usd_to_eur();
    let rows = [premium_row("USD", 10000)];

    let quote = engine()
        .get_quote(&premium_phase(), None, Some(&fx), &rows, &request("registration", "EUR", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 9000);
    assert_eq!(quote.fees[0].currency, cur("USD"));
}

#[test]
fn test_accumulate_mode_sums_every_row() {
    let engine = PricingEngine::new(Config {
        premium_mode: PremiumMode::Accumulate,
        ..Config::default()
    });
    let fx = usd_to_eur();
    let rows = [premium_row("USD", 10000), premium_row("EUR", 9500)];

    let quote = engine
        .get_quote(&premium_phase(), None, Some(&fx), &rows, &request("registration", "EUR", 1))
        .unwrap();
    assert_eq!(quote.price.amount, 9000 + 9500);
    assert_eq!(quote.fees.len(), 2);
    assert!(quote.fees.iter().all(|f| f.name == PREMIUM_FEE));
}

// =============================================================================
// Consistency checks
// =============================================================================

#[test]
fn test_phase_name_must_match() {
    let err = engine()
        .get_quote(
            &ga_phase(),
            None,
            None,
            &[],
            &request("registration", "USD", 1).with_phase("sunrise"),
        )
        .unwrap_err();
    assert!(matches!(err, QuoteError::InvalidPhaseName { .. }));
}

#[test]
fn test_implicit_phase_must_be_current_ga() {
    let mut phase = ga_phase();
    phase.set_end(start() + Duration::days(10), start()).unwrap();

    let err = engine()
        .get_quote(&phase, None, None, &[], &request("registration", "USD", 1))
        .unwrap_err();
    assert!(matches!(err, QuoteError::InvalidPhaseName { .. }));
}

#[test]
fn test_domain_must_match_request() {
    let other = Domain::new(
        DomainName::parse("other.tld").unwrap(),
        ClId::parse("registrar1").unwrap(),
    );
    let err = engine()
        .get_quote(&ga_phase(), Some(&other), None, &[], &request("renewal", "USD", 1))
        .unwrap_err();
    assert_eq!(
        err,
        QuoteError::InvalidDomainName {
            expected: "example.tld".to_string(),
            found: "other.tld".to_string()
        }
    );
}

#[test]
fn test_years_limited_by_phase_horizon() {
    let mut phase = Phase::new(
        "GA",
        "tld",
        PhaseType::GA,
        start(),
        PhasePolicy::new(cur("USD"), 5).unwrap(),
    )
    .unwrap();
    phase
        .add_price(Price::new(cur("USD"), 1000, 1000, 1000, 5000))
        .unwrap();

    let err = engine()
        .get_quote(&phase, None, None, &[], &request("registration", "USD", 6))
        .unwrap_err();
    assert_eq!(
        err,
        QuoteError::InvalidRequest(RequestError::YearsOutOfRange { years: 6, max: 5 })
    );
}

#[test]
fn test_quote_serializes_camel_case() {
    let fx = usd_to_eur();
    let quote = engine()
        .get_quote(&ga_phase(), None, Some(&fx), &[], &request("registration", "EUR", 1))
        .unwrap();
    let json = serde_json::to_value(&quote).unwrap();

    assert_eq!(json["domainName"], "example.tld");
    assert_eq!(json["transactionType"], "registration");
    assert_eq!(json["registrarId"], "registrar1");
    assert_eq!(json["price"]["amount"], 900);
    assert_eq!(json["price"]["currency"], "EUR");
    assert!(json["fxRate"].is_object());
    assert_eq!(json["requiresValidation"], false);
}

#[test]
fn test_quote_reports_phase_validation_requirement() {
    let mut phase = Phase::new(
        "sunrise",
        "tld",
        PhaseType::Launch,
        start(),
        PhasePolicy::new(cur("USD"), 10).unwrap().with_validation(),
    )
    .unwrap();
    phase
        .add_price(Price::new(cur("USD"), 1000, 1000, 1000, 5000))
        .unwrap();

    let quote = engine()
        .get_quote(
            &phase,
            None,
            None,
            &[],
            &request("registration", "USD", 1).with_phase("sunrise"),
        )
        .unwrap();
    assert!(quote.requires_validation);
    assert_eq!(serde_json::to_value(&quote).unwrap()["requiresValidation"], true);

    let quote = engine()
        .get_quote(&ga_phase(), None, None, &[], &request("registration", "USD", 1))
        .unwrap();
    assert!(!quote.requires_validation);
}

mod premium_mode_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_premium_mode_selection(
            usd in 1u64..10_000_000,
            eur in 1u64..10_000_000,
            years in 1u32..=10,
        ) {
            let fx = usd_to_eur();
            let rows = [premium_row("USD", usd), premium_row("EUR", eur)];
            let req = request("registration", "EUR", years);

            let single = engine()
                .get_quote(&premium_phase(), None, Some(&fx), &rows, &req)
                .unwrap();
            prop_assert_eq!(single.price.amount, eur * u64::from(years));
            prop_assert_eq!(single.fees.len(), 1);

            let accumulate = PricingEngine::new(Config {
                premium_mode: PremiumMode::Accumulate,
                ..Config::default()
            })
            .get_quote(&premium_phase(), None, Some(&fx), &rows, &req)
            .unwrap();
            let converted = fx
                .convert(&registry_core::Money::new(cur("USD"), usd * u64::from(years)))
                .unwrap();
            prop_assert_eq!(
                accumulate.price.amount,
                converted.amount + eur * u64::from(years)
            );
            prop_assert_eq!(accumulate.fees.len(), 2);
        }
    }
}
