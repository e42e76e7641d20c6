use numfmt::{Formatter, Precision};

/// numfmt switches to scientific notation from 10^12, so larger values are
/// grouped one nine digit block at a time.
const SCIENTIFIC_CUTOFF: f64 = 1_000_000_000_000.0;
const BLOCK: f64 = 1_000_000_000.0;

/// Renders numbers with `,` grouping separators.
pub trait NumberFormatter {
    /// Integer with no decimals, e.g. `200,000`.
    fn thousands_int(self) -> String;
    /// Exactly two decimals, e.g. `1,234.50`.
    fn thousands_fiat(self) -> String;
}

impl NumberFormatter for f64 {
    fn thousands_int(self) -> String {
        // half away from zero, so half a sat rounds up
        let rounded = self.round();
        let digits = group_digits(&mut grouping(), rounded.abs());
        signed(rounded < 0.0, digits)
    }

    fn thousands_fiat(self) -> String {
        // numfmt truncates and drops trailing zeros, so cents are rounded and padded here
        let cents = (self.abs() * 100.0).round();
        let whole = group_digits(&mut grouping(), (cents / 100.0).trunc());
        let digits = format!("{}.{:02}", whole, (cents % 100.0) as u64);
        signed(self < 0.0 && cents > 0.0, digits)
    }
}

fn grouping() -> Formatter {
    Formatter::new()
        .separator(',')
        .expect("comma is a single byte separator")
        .precision(Precision::Decimals(0))
}

/// Groups a non-negative whole number.
fn group_digits(f: &mut Formatter, whole: f64) -> String {
    if !whole.is_finite() || whole < SCIENTIFIC_CUTOFF {
        return f.fmt2(whole).to_string();
    }

    let low = whole % BLOCK;
    let high = ((whole - low) / BLOCK).round();
    let high = group_digits(f, high);

    // the leading 1 keeps the zero padding of the low block
    let padded = f.fmt2(BLOCK + low);
    let low = padded.strip_prefix("1,").unwrap_or(padded);
    format!("{high},{low}")
}

fn signed(negative: bool, digits: String) -> String {
    // no "-0" or "-0.00"
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}
