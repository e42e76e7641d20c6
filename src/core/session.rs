//! State of one converter session: selected currency, current rate and the two linked fields

use super::conversion::{self, ConversionRate};
use super::currency::{CurrencyCode, RateProvider};
use super::selection::SelectionStore;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Sats,
}

/// Fiat and satoshi text fields. The last edited field is authoritative, the other is derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountPair {
    pub amount: String,
    pub sats: String,
    pub last_edited: Option<Field>,
}

impl AmountPair {
    fn recompute(&mut self, rate: ConversionRate) {
        match self.last_edited {
            Some(Field::Amount) => self.sats = conversion::amount_text_to_sats(&self.amount, rate),
            Some(Field::Sats) => self.amount = conversion::sats_text_to_amount(&self.sats, rate),
            None => {}
        }
    }
}

pub struct Session {
    provider: Arc<dyn RateProvider>,
    selection: SelectionStore,
    currency: CurrencyCode,
    rate: ConversionRate,
    pair: AmountPair,
}

impl Session {
    /// Starts with the saved currency (or `override_currency`, which is not
    /// persisted) and fetches its rate.
    pub async fn start(
        provider: Arc<dyn RateProvider>,
        selection: SelectionStore,
        override_currency: Option<CurrencyCode>,
    ) -> Self {
        let currency = match override_currency {
            Some(currency) => currency,
            None => selection.load().await,
        };

        let mut session = Self {
            provider,
            selection,
            currency,
            rate: ConversionRate::UNKNOWN,
            pair: AmountPair::default(),
        };
        session.refresh_rate().await;
        session
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn rate(&self) -> ConversionRate {
        self.rate
    }

    pub fn pair(&self) -> &AmountPair {
        &self.pair
    }

    /// Switches currency, remembers the choice and refetches the rate.
    pub async fn select_currency(&mut self, currency: CurrencyCode) {
        debug!(from = %self.currency, to = %currency, "Selecting currency");
        self.currency = currency;
        self.selection.save(currency).await;
        self.refresh_rate().await;
    }

    /// Fetches the rate for the current currency. Any failure leaves the rate unknown.
    #[instrument(name = "RateRefresh", skip(self), fields(currency = %self.currency))]
    pub async fn refresh_rate(&mut self) {
        // unknown while the request is in flight
        self.rate = ConversionRate::UNKNOWN;
        self.rate = match self.provider.fetch_rate(self.currency).await {
            Ok(rate) => {
                let rate = ConversionRate::new(rate);
                if !rate.is_known() {
                    error!(rate = rate.value(), "Provider returned an unusable rate");
                }
                rate
            }
            Err(e) => {
                error!(error = ?e, "Error fetching conversion rate");
                ConversionRate::UNKNOWN
            }
        };
        self.pair.recompute(self.rate);
    }

    pub fn edit_amount(&mut self, text: &str) {
        self.pair.amount = conversion::strip_separators(text);
        self.pair.last_edited = Some(Field::Amount);
        self.pair.recompute(self.rate);
    }

    pub fn edit_sats(&mut self, text: &str) {
        self.pair.sats = conversion::strip_separators(text);
        self.pair.last_edited = Some(Field::Sats);
        self.pair.recompute(self.rate);
    }

    /// Formatted rate, or `Loading...` while unknown.
    pub fn rate_display(&self) -> String {
        self.rate.to_string()
    }

    pub fn market_url(&self) -> String {
        self.provider.market_url(self.currency)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::selection::tests::BrokenCollection;
    use crate::store::memory::MemoryCollection;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves fixed rates per currency and records which currencies were requested.
    pub(crate) struct FixedRateProvider {
        rates: HashMap<CurrencyCode, f64>,
        pub(crate) requests: Mutex<Vec<CurrencyCode>>,
    }

    impl FixedRateProvider {
        pub(crate) fn new(rates: &[(CurrencyCode, f64)]) -> Self {
            Self {
                rates: rates.iter().copied().collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RateProvider for FixedRateProvider {
        async fn fetch_rate(&self, currency: CurrencyCode) -> Result<f64> {
            self.requests.lock().unwrap().push(currency);
            self.rates
                .get(&currency)
                .copied()
                .ok_or_else(|| anyhow!("Network error for {}", currency.code()))
        }

        fn market_url(&self, currency: CurrencyCode) -> String {
            format!("https://market.test/{}", currency.code())
        }
    }

    fn memory_selection() -> SelectionStore {
        SelectionStore::new(Some(Arc::new(MemoryCollection::new())))
    }

    #[tokio::test]
    async fn test_start_uses_saved_currency() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Usd, 60_000.0)]));
        let selection = memory_selection();
        selection.save(CurrencyCode::Usd).await;

        let session = Session::start(provider.clone(), selection, None).await;
        assert_eq!(session.currency(), CurrencyCode::Usd);
        assert_eq!(session.rate(), ConversionRate::new(60_000.0));
        assert_eq!(session.rate_display(), "60,000.00");
        assert_eq!(session.market_url(), "https://market.test/usd");
        assert_eq!(*provider.requests.lock().unwrap(), vec![CurrencyCode::Usd]);
    }

    #[tokio::test]
    async fn test_start_defaults_to_cad() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Cad, 50_000.0)]));
        let session = Session::start(provider, memory_selection(), None).await;
        assert_eq!(session.currency(), CurrencyCode::Cad);
        assert!(session.rate().is_known());
    }

    #[tokio::test]
    async fn test_override_is_not_persisted() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Jpy, 9_000_000.0)]));
        let selection = memory_selection();

        let session = Session::start(provider, selection.clone(), Some(CurrencyCode::Jpy)).await;
        assert_eq!(session.currency(), CurrencyCode::Jpy);
        assert_eq!(selection.load().await, CurrencyCode::Cad);
    }

    #[tokio::test]
    async fn test_edit_amount_derives_sats() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Cad, 50_000.0)]));
        let mut session = Session::start(provider, memory_selection(), None).await;

        session.edit_amount("100");
        assert_eq!(session.pair().amount, "100");
        assert_eq!(session.pair().sats, "200,000");
        assert_eq!(session.pair().last_edited, Some(Field::Amount));

        session.edit_amount("1,000");
        assert_eq!(session.pair().amount, "1000");
        assert_eq!(session.pair().sats, "2,000,000");
    }

    #[tokio::test]
    async fn test_edit_sats_derives_amount() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Cad, 50_000.0)]));
        let mut session = Session::start(provider, memory_selection(), None).await;

        session.edit_sats("200,000");
        assert_eq!(session.pair().sats, "200000");
        assert_eq!(session.pair().amount, "100.00");
        assert_eq!(session.pair().last_edited, Some(Field::Sats));
    }

    #[tokio::test]
    async fn test_invalid_input_clears_derived_field() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Cad, 50_000.0)]));
        let mut session = Session::start(provider, memory_selection(), None).await;

        session.edit_amount("100");
        assert_eq!(session.pair().sats, "200,000");

        session.edit_amount("abc");
        assert_eq!(session.pair().amount, "abc");
        assert_eq!(session.pair().sats, "");

        session.edit_sats("");
        assert_eq!(session.pair().amount, "");
    }

    #[tokio::test]
    async fn test_overflowing_amount_clears_sats() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Cad, 0.5)]));
        let mut session = Session::start(provider, memory_selection(), None).await;

        session.edit_amount("1e308");
        assert_eq!(session.pair().amount, "1e308");
        assert_eq!(session.pair().sats, "");
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_rate_unknown() {
        let provider = Arc::new(FixedRateProvider::new(&[]));
        let mut session = Session::start(provider, memory_selection(), None).await;

        assert_eq!(session.rate(), ConversionRate::UNKNOWN);
        assert_eq!(session.rate_display(), "Loading...");

        // input handlers keep working, they just derive nothing
        session.edit_amount("100");
        assert_eq!(session.pair().sats, "");
        session.edit_sats("5000");
        assert_eq!(session.pair().amount, "");
    }

    #[tokio::test]
    async fn test_unusable_rate_is_unknown() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Cad, -1.0)]));
        let session = Session::start(provider, memory_selection(), None).await;
        assert!(!session.rate().is_known());
    }

    #[tokio::test]
    async fn test_select_currency_persists_and_recomputes() {
        let provider = Arc::new(FixedRateProvider::new(&[
            (CurrencyCode::Cad, 50_000.0),
            (CurrencyCode::Usd, 25_000.0),
        ]));
        let selection = memory_selection();
        let mut session = Session::start(provider.clone(), selection.clone(), None).await;

        session.edit_amount("100");
        assert_eq!(session.pair().sats, "200,000");

        session.select_currency(CurrencyCode::Usd).await;
        assert_eq!(session.currency(), CurrencyCode::Usd);
        assert_eq!(selection.load().await, CurrencyCode::Usd);
        assert_eq!(session.pair().amount, "100");
        assert_eq!(session.pair().sats, "400,000");

        // no rate for PHP, so the derived field is cleared
        session.select_currency(CurrencyCode::Php).await;
        assert_eq!(session.rate(), ConversionRate::UNKNOWN);
        assert_eq!(session.pair().sats, "");

        assert_eq!(
            *provider.requests.lock().unwrap(),
            vec![CurrencyCode::Cad, CurrencyCode::Usd, CurrencyCode::Php]
        );
    }

    #[tokio::test]
    async fn test_broken_selection_storage_does_not_surface() {
        let provider = Arc::new(FixedRateProvider::new(&[(CurrencyCode::Usd, 25_000.0)]));
        let selection = SelectionStore::new(Some(Arc::new(BrokenCollection)));
        let mut session = Session::start(provider, selection, None).await;
        assert_eq!(session.currency(), CurrencyCode::Cad);

        session.select_currency(CurrencyCode::Usd).await;
        assert_eq!(session.currency(), CurrencyCode::Usd);
        assert!(session.rate().is_known());
    }
}
