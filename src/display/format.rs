//! Currency formatting for display
//!
//! Brazilian convention: dot thousands separator, comma decimal separator.

use rust_decimal::{Decimal, RoundingStrategy};

/// `R$ 1.234,56`
pub fn format_brl(value: Decimal) -> String {
    format_currency("R$", value)
}

/// `US$ 1.234,56`
pub fn format_usd(value: Decimal) -> String {
    format_currency("US$", value)
}

/// Direction arrow for a change percentage
pub fn change_arrow(change_percent: Decimal) -> &'static str {
    if change_percent > Decimal::ZERO {
        "↑"
    } else if change_percent < Decimal::ZERO {
        "↓"
    } else {
        "="
    }
}

/// `↑2.50%`, `↓1.25%`, `=0.00%`
pub fn format_change(change_percent: Decimal) -> String {
    format!(
        "{}{:.2}%",
        change_arrow(change_percent),
        round2(change_percent).abs()
    )
}

fn format_currency(symbol: &str, value: Decimal) -> String {
    let rounded = round2(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}{symbol} {},{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
