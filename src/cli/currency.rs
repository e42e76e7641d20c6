use super::ui;
use crate::core::{CurrencyCode, SelectionStore};
use comfy_table::{Cell, Color};

/// Lists the supported currencies, marking the selected one.
pub fn render_currencies(selected: CurrencyCode) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
    ]);

    for currency in CurrencyCode::ALL {
        let marker = if currency == selected {
            Cell::new("*").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(currency.code()),
            Cell::new(currency.label()),
        ]);
    }

    format!(
        "Selected currency: {}\n{}",
        ui::style_text(selected.label(), ui::StyleType::Value),
        table
    )
}

/// Shows, changes or resets the remembered currency.
pub async fn run(selection: &SelectionStore, currency: Option<CurrencyCode>, reset: bool) -> String {
    if reset {
        selection.reset().await;
    }
    if let Some(currency) = currency {
        selection.save(currency).await;
    }
    render_currencies(selection.load().await)
}
