//! Supported fiat currencies and the rate lookup abstraction

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurrencyCode {
    #[default]
    Cad,
    Usd,
    Jpy,
    Php,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 4] = [
        CurrencyCode::Cad,
        CurrencyCode::Usd,
        CurrencyCode::Jpy,
        CurrencyCode::Php,
    ];

    /// Lowercase code used as the rate lookup key and the persisted value.
    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Cad => "cad",
            CurrencyCode::Usd => "usd",
            CurrencyCode::Jpy => "jpy",
            CurrencyCode::Php => "php",
        }
    }

    /// Uppercase label shown next to the amount field.
    pub fn label(&self) -> &'static str {
        match self {
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Php => "PHP",
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cad" => Ok(CurrencyCode::Cad),
            "usd" => Ok(CurrencyCode::Usd),
            "jpy" => Ok(CurrencyCode::Jpy),
            "php" => Ok(CurrencyCode::Php),
            _ => Err(anyhow::anyhow!(
                "Unsupported currency: {} (expected one of cad, usd, jpy, php)",
                s
            )),
        }
    }
}

/// Looks up the price of 1 BTC in a fiat currency.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, currency: CurrencyCode) -> Result<f64>;

    /// Link to a human readable market page for the currency.
    fn market_url(&self, currency: CurrencyCode) -> String;
}
