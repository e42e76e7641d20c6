//! Fiat amount <-> satoshi conversion

use std::fmt::Display;

use super::format::NumberFormatter;

pub const SATS_PER_BTC: f64 = 100_000_000.0;

/// Price of 1 BTC in a fiat currency. Zero means the rate is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ConversionRate(f64);

impl ConversionRate {
    pub const UNKNOWN: ConversionRate = ConversionRate(0.0);

    /// Negative and non-finite values collapse to `UNKNOWN`.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            ConversionRate(value)
        } else {
            Self::UNKNOWN
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 > 0.0
    }
}

impl Display for ConversionRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_known() {
            write!(f, "{}", self.0.thousands_fiat())
        } else {
            write!(f, "Loading...")
        }
    }
}

pub fn to_sats(amount: f64, rate: ConversionRate) -> Option<f64> {
    if !rate.is_known() || !amount.is_finite() {
        return None;
    }
    Some((amount / rate.value()) * SATS_PER_BTC).filter(|sats| sats.is_finite())
}

pub fn to_amount(sats: f64, rate: ConversionRate) -> Option<f64> {
    if !rate.is_known() || !sats.is_finite() {
        return None;
    }
    Some((sats / SATS_PER_BTC) * rate.value()).filter(|amount| amount.is_finite())
}

/// Parses user input, ignoring `,` grouping separators and surrounding whitespace.
pub fn parse_input(text: &str) -> Option<f64> {
    strip_separators(text)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub fn strip_separators(text: &str) -> String {
    text.replace(',', "")
}

/// Derives the sats field text from fiat amount text. Empty when nothing can be computed.
pub fn amount_text_to_sats(text: &str, rate: ConversionRate) -> String {
    parse_input(text)
        .and_then(|amount| to_sats(amount, rate))
        .map(|sats| sats.thousands_int())
        .unwrap_or_default()
}

/// Derives the fiat field text from sats text. Empty when nothing can be computed.
pub fn sats_text_to_amount(text: &str, rate: ConversionRate) -> String {
    parse_input(text)
        .and_then(|sats| to_amount(sats, rate))
        .map(|amount| amount.thousands_fiat())
        .unwrap_or_default()
}
