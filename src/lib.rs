pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::cache::Store;
use crate::core::config::AppConfig;
use crate::core::selection::SELECTION_COLLECTION;
use crate::core::{CurrencyCode, RateProvider, SelectionStore};
use crate::providers::CoinGeckoProvider;
use crate::store::KeyValueStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Rate {
        currency: Option<CurrencyCode>,
    },
    ToSats {
        amount: String,
        currency: Option<CurrencyCode>,
    },
    ToFiat {
        sats: String,
        currency: Option<CurrencyCode>,
    },
    Currency {
        currency: Option<CurrencyCode>,
        reset: bool,
    },
    Interactive,
}

fn open_store(config: &AppConfig) -> KeyValueStore {
    let store = match config.default_data_path() {
        Ok(path) => KeyValueStore::open(&path),
        Err(e) => {
            warn!(error = ?e, "No data directory, nothing will be persisted");
            KeyValueStore::in_memory()
        }
    };
    debug!(persistent = store.is_persistent(), "Opened key-value store");
    store
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Sats converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = open_store(&config);
    let selection = SelectionStore::new(store.get_collection(SELECTION_COLLECTION, true));

    let provider: Arc<dyn RateProvider> = Arc::new(CoinGeckoProvider::new(
        config.coingecko_base_url(),
        &store,
        config.rate_cache_ttl(),
    )?);

    match command {
        AppCommand::Rate { currency } => {
            let session = cli::ui::start_session(provider, selection, currency).await;
            println!("{}", cli::convert::render_rate(&session));
        }
        AppCommand::ToSats { amount, currency } => {
            let mut session = cli::ui::start_session(provider, selection, currency).await;
            println!("{}", cli::convert::render_to_sats(&mut session, &amount));
        }
        AppCommand::ToFiat { sats, currency } => {
            let mut session = cli::ui::start_session(provider, selection, currency).await;
            println!("{}", cli::convert::render_to_fiat(&mut session, &sats));
        }
        AppCommand::Interactive => {
            let mut session = cli::ui::start_session(provider, selection, None).await;
            cli::interactive::run(&mut session).await?;
        }
        AppCommand::Currency { currency, reset } => {
            println!("{}", cli::currency::run(&selection, currency, reset).await);
        }
    }

    Ok(())
}
