use crate::core::cache::{KeyValueCollection, Store};
use crate::core::currency::{CurrencyCode, RateProvider};
use crate::store::KeyValueStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const MARKET_PAGE_URL: &str = "https://www.coingecko.com/en/coins/bitcoin";
const USER_AGENT: &str = concat!("satsconv/", env!("CARGO_PKG_VERSION"));

pub const RATE_COLLECTION: &str = "rates";

/// `{"bitcoin": {"cad": 95123.45}}`
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Fetches BTC prices from the CoinGecko simple price API.
pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
    cache: Option<Arc<dyn KeyValueCollection>>,
    ttl: Option<Duration>,
}

impl CoinGeckoProvider {
    /// Caches rates in the store's persistent rate collection for `ttl`.
    /// A `None` ttl disables caching.
    pub fn new(base_url: &str, store: &KeyValueStore, ttl: Option<Duration>) -> Result<Self> {
        let cache = ttl.and_then(|_| store.get_collection(RATE_COLLECTION, true));
        Self::new_with_collection(base_url, cache, ttl)
    }

    pub fn new_with_collection(
        base_url: &str,
        cache: Option<Arc<dyn KeyValueCollection>>,
        ttl: Option<Duration>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            cache,
            ttl,
        })
    }

    async fn cached_rate(&self, currency: CurrencyCode) -> Option<f64> {
        let cache = self.cache.as_ref()?;
        match cache.get(currency.code().as_bytes()).await {
            Ok(Some(raw)) => match serde_json::from_slice::<f64>(&raw) {
                Ok(rate) => Some(rate),
                Err(e) => {
                    debug!(error = %e, "Ignoring undecodable cached rate");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = ?e, "Rate cache read failed");
                None
            }
        }
    }

    async fn cache_rate(&self, currency: CurrencyCode, rate: f64) {
        let Some(cache) = &self.cache else {
            return;
        };
        let result = match serde_json::to_vec(&rate) {
            Ok(raw) => cache.put(currency.code().as_bytes(), &raw, self.ttl).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(error = ?e, "Rate cache write failed");
        }
    }
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoRateFetch",
        skip(self),
        fields(currency = %currency.code())
    )]
    async fn fetch_rate(&self, currency: CurrencyCode) -> Result<f64> {
        if let Some(cached) = self.cached_rate(currency).await {
            return Ok(cached);
        }

        let code = currency.code();
        let url = format!(
            "{}/api/v3/simple/price?ids=bitcoin&vs_currencies={}",
            self.base_url, code
        );
        debug!("Requesting conversion rate from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency: {}", e, code))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {}",
                response.status(),
                code
            ));
        }

        let text = response.text().await?;
        let data: SimplePriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", code, e))?;

        let rate = data
            .get("bitcoin")
            .and_then(|prices| prices.get(code))
            .copied()
            .ok_or_else(|| anyhow!("No rate data found for currency: {}", code))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(anyhow!("Invalid rate {} for currency: {}", rate, code));
        }

        self.cache_rate(currency, rate).await;
        Ok(rate)
    }

    fn market_url(&self, currency: CurrencyCode) -> String {
        format!("{}/{}", MARKET_PAGE_URL, currency.code())
    }
}
