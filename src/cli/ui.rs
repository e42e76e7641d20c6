use crate::core::{CurrencyCode, Field, RateProvider, SelectionStore, Session};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Value,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// A field value cell. Empty fields show their placeholder dimmed.
fn field_cell(value: &str, placeholder: &str, authoritative: bool) -> Cell {
    if value.is_empty() {
        return Cell::new(placeholder)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right);
    }
    let cell = Cell::new(value).set_alignment(CellAlignment::Right);
    if authoritative {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell.fg(Color::Green)
    }
}

/// Creates a spinner shown while a rate is loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Starts a session behind a spinner.
pub async fn start_session(
    provider: Arc<dyn RateProvider>,
    selection: SelectionStore,
    currency: Option<CurrencyCode>,
) -> Session {
    let pb = new_spinner("Fetching conversion rate...");
    let session = Session::start(provider, selection, currency).await;
    pb.finish_and_clear();
    session
}

/// Rate readout line, e.g. `Current BTC to CAD rate: 95,123.45`.
pub fn rate_line(session: &Session) -> String {
    let rate = session.rate_display();
    let styled = if session.rate().is_known() {
        style_text(&rate, StyleType::Value)
    } else {
        style_text(&rate, StyleType::Subtle)
    };
    format!(
        "Current BTC to {} rate: {}",
        session.currency().label(),
        styled
    )
}

/// Market data link line, e.g. `(CoinGecko - CAD) https://...`.
pub fn market_line(session: &Session) -> String {
    style_text(
        &format!(
            "(CoinGecko - {}) {}",
            session.currency().label(),
            session.market_url()
        ),
        StyleType::Subtle,
    )
}

/// Renders the rate, both fields and the market link.
pub fn render_session(session: &Session) -> String {
    let label = session.currency().label();
    let pair = session.pair();

    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    table.add_row(vec![
        Cell::new(label),
        field_cell(
            &pair.amount,
            &format!("Enter {label} amount"),
            pair.last_edited == Some(Field::Amount),
        ),
    ]);
    table.add_row(vec![
        Cell::new("SATS"),
        field_cell(
            &pair.sats,
            "Enter SATS amount",
            pair.last_edited == Some(Field::Sats),
        ),
    ]);

    format!(
        "{}\n{}\n{}",
        rate_line(session),
        table,
        market_line(session)
    )
}
