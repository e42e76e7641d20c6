use super::ui;
use crate::core::Session;

/// Output of the `rate` command.
pub fn render_rate(session: &Session) -> String {
    let mut output = ui::rate_line(session);
    if !session.rate().is_known() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text("Rate unavailable, see log for details", ui::StyleType::Error)
        ));
    }
    output.push('\n');
    output.push_str(&ui::market_line(session));
    output
}

/// Output of `to-sats`: the amount is entered into the fiat field.
pub fn render_to_sats(session: &mut Session, amount: &str) -> String {
    session.edit_amount(amount);
    ui::render_session(session)
}

/// Output of `to-fiat`: the amount is entered into the sats field.
pub fn render_to_fiat(session: &mut Session, sats: &str) -> String {
    session.edit_sats(sats);
    ui::render_session(session)
}
