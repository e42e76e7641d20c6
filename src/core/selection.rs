//! Remembers the selected currency between runs

use super::cache::KeyValueCollection;
use super::currency::CurrencyCode;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const SELECTION_COLLECTION: &str = "selection";
const SELECTED_CURRENCY_KEY: &[u8] = b"selectedCurrency";

/// Reads and writes the selected currency. Storage failures are logged and
/// never returned: reads fall back to the default currency, writes are dropped.
#[derive(Clone)]
pub struct SelectionStore {
    collection: Option<Arc<dyn KeyValueCollection>>,
}

impl SelectionStore {
    pub fn new(collection: Option<Arc<dyn KeyValueCollection>>) -> Self {
        if collection.is_none() {
            warn!("Selection storage unavailable, the selected currency will not be remembered");
        }
        Self { collection }
    }

    pub async fn load(&self) -> CurrencyCode {
        let Some(collection) = &self.collection else {
            return CurrencyCode::default();
        };

        let saved = match collection.get(SELECTED_CURRENCY_KEY).await {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                debug!("No saved currency, using default");
                return CurrencyCode::default();
            }
            Err(e) => {
                error!(error = ?e, "Error reading saved currency");
                return CurrencyCode::default();
            }
        };

        match String::from_utf8_lossy(&saved).parse::<CurrencyCode>() {
            Ok(currency) => {
                debug!(%currency, "Loaded saved currency");
                currency
            }
            Err(e) => {
                warn!(error = %e, "Ignoring saved currency");
                CurrencyCode::default()
            }
        }
    }

    pub async fn save(&self, currency: CurrencyCode) {
        let Some(collection) = &self.collection else {
            return;
        };

        match collection
            .put(SELECTED_CURRENCY_KEY, currency.code().as_bytes(), None)
            .await
        {
            Ok(()) => debug!(%currency, "Saved selected currency"),
            Err(e) => error!(error = ?e, "Error saving selected currency"),
        }
    }

    /// Forgets the saved selection so the next load returns the default.
    pub async fn reset(&self) {
        let Some(collection) = &self.collection else {
            return;
        };

        if let Err(e) = collection.remove(SELECTED_CURRENCY_KEY).await {
            error!(error = ?e, "Error removing saved currency");
        }
    }
}
