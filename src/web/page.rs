//! HTML rendering for the tracker page

use crate::display::format::{format_brl, format_usd};
use crate::display::Snapshot;
use crate::portfolio::InvestmentPosition;
use crate::ws::ConnectionState;
use rust_decimal::Decimal;

/// Everything the page shows
pub struct PageView<'a> {
    pub position: &'a InvestmentPosition,
    pub snapshot: Option<&'a Snapshot>,
    /// Current price converted to USD, when a rate is available
    pub price_usd: Option<Decimal>,
    pub feed_state: ConnectionState,
    pub refresh_secs: u64,
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
        .card { background: white; border-radius: 8px; padding: 20px; margin: 20px 0; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .value { font-size: 24px; font-weight: bold; color: #333; }
        .profit-positive { color: #28a745; }
        .profit-negative { color: #dc3545; }
        .last-update { color: #666; font-size: 12px; text-align: right; }
"#;

pub fn render(view: &PageView<'_>) -> String {
    let body = match view.snapshot {
        Some(snapshot) => render_summary(view, snapshot),
        None => render_waiting(view),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Bitcoin Investment Tracker</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="refresh" content="{refresh}">
    <style>{style}</style>
</head>
<body>
    <h1>Bitcoin Investment Tracker</h1>
{body}
    <p class="last-update">Feed: {state}</p>
</body>
</html>
"#,
        style = STYLE,
        refresh = view.refresh_secs,
        state = view.feed_state,
    )
}

fn render_summary(view: &PageView<'_>, snapshot: &Snapshot) -> String {
    let price = match view.price_usd {
        Some(usd) => format!(
            "{} ({})",
            format_brl(snapshot.observation.price),
            format_usd(usd)
        ),
        None => format_brl(snapshot.observation.price),
    };
    let (value, profit_line) = match &snapshot.metrics {
        Some(metrics) => {
            let profit_class = if metrics.is_profit() {
                "profit-positive"
            } else {
                "profit-negative"
            };
            (
                format_brl(metrics.current_value),
                format!(
                    r#"<span class="value {profit_class}">
            {profit} ({percent:.2}%)
        </span>"#,
                    profit = format_brl(metrics.profit),
                    percent = metrics.profit_percent,
                ),
            )
        }
        None => (
            "unavailable".to_string(),
            r#"<span class="value">unavailable</span>"#.to_string(),
        ),
    };

    format!(
        r#"    <div class="card">
        <h2>Investment Summary</h2>
        <p>Initial Investment: <span class="value">{investment}</span></p>
        <p>Bitcoin Amount: <span class="value">{amount}</span> BTC</p>
        <p>Current BTC Price: <span class="value">{price}</span></p>
        <p>Current Value: <span class="value">{value}</span></p>
        <p>Profit/Loss: {profit_line}</p>
    </div>
    <p class="last-update">Last update: {updated}</p>
"#,
        investment = format_brl(view.position.cost_basis),
        amount = view.position.amount_held.normalize(),
        updated = snapshot.received_at.format("%d/%m/%Y %H:%M:%S UTC"),
    )
}

fn render_waiting(view: &PageView<'_>) -> String {
    format!(
        r#"    <div class="card">
        <h2>Investment Summary</h2>
        <p>Initial Investment: <span class="value">{investment}</span></p>
        <p>Bitcoin Amount: <span class="value">{amount}</span> BTC</p>
        <p>Waiting for the first price update...</p>
    </div>
"#,
        investment = format_brl(view.position.cost_basis),
        amount = view.position.amount_held.normalize(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PriceObservation;
    use crate::portfolio::DerivedMetrics;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn snapshot(price: Decimal, position: &InvestmentPosition) -> Snapshot {
        let observation = PriceObservation::new(price, dec!(2.5));
        Snapshot {
            observation,
            position: *position,
            metrics: DerivedMetrics::compute(&observation, position).ok(),
            received_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_render_summary() {
        let position = InvestmentPosition::new(dec!(0.1), dec!(20000));
        let snapshot = snapshot(dec!(650000), &position);
        let html = render(&PageView {
            position: &position,
            snapshot: Some(&snapshot),
            price_usd: Some(dec!(127450.98)),
            feed_state: ConnectionState::Connected,
            refresh_secs: 10,
        });

        assert!(html.contains(r#"<meta http-equiv="refresh" content="10">"#));
        assert!(html.contains("R$ 20.000,00"));
        assert!(html.contains("<span class=\"value\">0.1</span> BTC"));
        assert!(html.contains("R$ 650.000,00 (US$ 127.450,98)"));
        assert!(html.contains("R$ 65.000,00"));
        assert!(html.contains("profit-positive"));
        assert!(html.contains("R$ 45.000,00 (225.00%)"));
        assert!(html.contains("Last update: 02/01/2024 03:04:05 UTC"));
        assert!(html.contains("Feed: connected"));
    }

    #[test]
    fn test_render_loss_without_usd() {
        let position = InvestmentPosition::new(dec!(0.1), dec!(20000));
        let snapshot = snapshot(dec!(150000), &position);
        let html = render(&PageView {
            position: &position,
            snapshot: Some(&snapshot),
            price_usd: None,
            feed_state: ConnectionState::Connecting,
            refresh_secs: 30,
        });

        assert!(html.contains("profit-negative"));
        assert!(html.contains("-R$ 5.000,00 (-25.00%)"));
        assert!(!html.contains("US$"));
        assert!(html.contains(r#"content="30""#));
    }

    #[test]
    fn test_render_price_when_metrics_unavailable() {
        let position = InvestmentPosition::new(dec!(0.1), dec!(0.0000000000000000000000000001));
        let snapshot = snapshot(dec!(650000), &position);
        assert!(snapshot.metrics.is_none());

        let html = render(&PageView {
            position: &position,
            snapshot: Some(&snapshot),
            price_usd: None,
            feed_state: ConnectionState::Connected,
            refresh_secs: 10,
        });

        assert!(html.contains("R$ 650.000,00"));
        assert!(html.contains("Current Value: <span class=\"value\">unavailable</span>"));
        assert!(!html.contains("Waiting for the first price update"));
    }

    #[test]
    fn test_render_waiting() {
        let position = InvestmentPosition::new(dec!(0.5), dec!(1000));
        let html = render(&PageView {
            position: &position,
            snapshot: None,
            price_usd: None,
            feed_state: ConnectionState::Disconnected,
            refresh_secs: 10,
        });

        assert!(html.contains("Waiting for the first price update"));
        assert!(html.contains("R$ 1.000,00"));
        assert!(html.contains("Feed: disconnected"));
    }
}
