use satsconv::core::cache::Store;
use satsconv::core::selection::SELECTION_COLLECTION;
use satsconv::core::{CurrencyCode, SelectionStore};
use satsconv::store::KeyValueStore;
use std::fs;
use std::path::Path;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(currency: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .and(query_param("vs_currencies", currency))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_failing_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_config(config_path: &Path, base_url: &str, data_path: &Path) {
    let config_content = format!(
        r#"
        providers:
          coingecko:
            base_url: {}
        rate_cache_ttl_secs: 0
        data_path: "{}"
    "#,
        base_url,
        data_path.display()
    );
    fs::write(config_path, config_content).expect("Failed to write config file");
}

async fn saved_currency(data_path: &Path) -> CurrencyCode {
    let store = KeyValueStore::open(data_path);
    SelectionStore::new(store.get_collection(SELECTION_COLLECTION, true))
        .load()
        .await
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server =
        test_utils::create_mock_server("usd", r#"{"bitcoin": {"usd": 50000.0}}"#).await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    write_config(config_path, &mock_server.uri(), data_dir.path());
    let config_path = config_path.to_str().unwrap();

    // Remember USD, then convert with it
    let result = satsconv::run_command(
        satsconv::AppCommand::Currency {
            currency: Some(CurrencyCode::Usd),
            reset: false,
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "Currency command failed with: {:?}", result.err());
    assert_eq!(saved_currency(data_dir.path()).await, CurrencyCode::Usd);

    for command in [
        satsconv::AppCommand::Rate { currency: None },
        satsconv::AppCommand::ToSats {
            amount: "100".to_string(),
            currency: None,
        },
        satsconv::AppCommand::ToFiat {
            sats: "200,000".to_string(),
            currency: None,
        },
    ] {
        info!(?command, "Running command against mock server");
        let result = satsconv::run_command(command, Some(config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    // Reset falls back to the default
    satsconv::run_command(
        satsconv::AppCommand::Currency {
            currency: None,
            reset: true,
        },
        Some(config_path),
    )
    .await
    .unwrap();
    assert_eq!(saved_currency(data_dir.path()).await, CurrencyCode::Cad);
}

#[test_log::test(tokio::test)]
async fn test_fetch_failure_is_not_fatal() {
    let mock_server = test_utils::create_failing_server().await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write_config(config_file.path(), &mock_server.uri(), data_dir.path());

    let result = satsconv::run_command(
        satsconv::AppCommand::ToSats {
            amount: "100".to_string(),
            currency: Some(CurrencyCode::Php),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Fetch failure should degrade, got: {:?}",
        result.err()
    );

    // The one-off currency was not remembered
    assert_eq!(saved_currency(data_dir.path()).await, CurrencyCode::Cad);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let result = satsconv::run_command(
        satsconv::AppCommand::Rate { currency: None },
        Some("/definitely/not/a/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
#[ignore = "talks to the live CoinGecko API"]
async fn test_real_coingecko_api() {
    use satsconv::core::RateProvider;
    use satsconv::providers::CoinGeckoProvider;

    let provider = CoinGeckoProvider::new_with_collection("https://api.coingecko.com", None, None)
        .expect("Failed to build provider");

    for currency in CurrencyCode::ALL {
        info!(%currency, "Fetching rate from CoinGecko");
        match provider.fetch_rate(currency).await {
            Ok(rate) => {
                info!(?rate, "Received successful rate response");
                assert!(rate > 0.0, "Rate should be positive");
            }
            Err(e) => {
                error!("Rate API request failed: {e}\n{e:?}");
                panic!("Rate API request failed: {e}");
            }
        }
    }
}
