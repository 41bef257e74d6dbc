//! Console price reporter

use super::format::{format_brl, format_change};
use crate::dispatch::{Consumer, ConsumerError};
use crate::feed::PriceObservation;
use crate::portfolio::InvestmentPosition;

/// Logs every observation as a one-line price report
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// `BTC Price: R$ 650.000,00 (↑2.50%)`
    pub fn describe(observation: &PriceObservation) -> String {
        format!(
            "BTC Price: {} ({})",
            format_brl(observation.price),
            format_change(observation.change_percent)
        )
    }
}

impl Consumer for ConsoleReporter {
    fn name(&self) -> &str {
        "console"
    }

    fn on_observation(
        &self,
        observation: &PriceObservation,
        _position: &InvestmentPosition,
    ) -> Result<(), ConsumerError> {
        tracing::info!("{}", Self::describe(observation));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_describe() {
        let obs = PriceObservation::new(dec!(650000.00), dec!(2.5));
        assert_eq!(
            ConsoleReporter::describe(&obs),
            "BTC Price: R$ 650.000,00 (↑2.50%)"
        );

        let obs = PriceObservation::new(dec!(598765.4), dec!(-0.8));
        assert_eq!(
            ConsoleReporter::describe(&obs),
            "BTC Price: R$ 598.765,40 (↓0.80%)"
        );
    }

    #[test]
    fn test_console_never_fails() {
        let obs = PriceObservation::new(dec!(1), dec!(0));
        let position = InvestmentPosition::new(dec!(0), dec!(0));
        assert!(ConsoleReporter::new().on_observation(&obs, &position).is_ok());
    }
}
