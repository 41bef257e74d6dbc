//! Position and derived metric types

use crate::feed::PriceObservation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Static holdings supplied by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentPosition {
    /// Quantity of the tracked asset owned
    pub amount_held: Decimal,
    /// Amount originally invested, in quote currency
    pub cost_basis: Decimal,
}

impl InvestmentPosition {
    pub fn new(amount_held: Decimal, cost_basis: Decimal) -> Self {
        Self {
            amount_held,
            cost_basis,
        }
    }
}

/// Figures derived from one observation. Always recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    /// amount_held * price
    pub current_value: Decimal,
    /// current_value - cost_basis
    pub profit: Decimal,
    /// profit / cost_basis * 100, or zero when cost_basis is zero
    pub profit_percent: Decimal,
}

/// A derived figure does not fit in a `Decimal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} overflowed")]
pub struct MetricsOverflow(pub &'static str);

impl DerivedMetrics {
    pub fn compute(
        observation: &PriceObservation,
        position: &InvestmentPosition,
    ) -> Result<Self, MetricsOverflow> {
        let current_value = position
            .amount_held
            .checked_mul(observation.price)
            .ok_or(MetricsOverflow("current_value"))?;
        let profit = current_value
            .checked_sub(position.cost_basis)
            .ok_or(MetricsOverflow("profit"))?;
        let profit_percent = if position.cost_basis.is_zero() {
            Decimal::ZERO
        } else {
            profit
                .checked_div(position.cost_basis)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or(MetricsOverflow("profit_percent"))?
        };

        Ok(Self {
            current_value,
            profit,
            profit_percent,
        })
    }

    pub fn is_profit(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let obs = PriceObservation::new(dec!(650000.00), dec!(2.5));
        let position = InvestmentPosition::new(dec!(0.1), dec!(20000));

        let metrics = DerivedMetrics::compute(&obs, &position).unwrap();
        assert_eq!(metrics.current_value, dec!(65000));
        assert_eq!(metrics.profit, dec!(45000));
        assert_eq!(metrics.profit_percent, dec!(225.0));
        assert!(metrics.is_profit());
    }

    #[test]
    fn test_loss() {
        let obs = PriceObservation::new(dec!(150000), dec!(-3.1));
        let position = InvestmentPosition::new(dec!(0.1), dec!(20000));

        let metrics = DerivedMetrics::compute(&obs, &position).unwrap();
        assert_eq!(metrics.current_value, dec!(15000));
        assert_eq!(metrics.profit, dec!(-5000));
        assert_eq!(metrics.profit_percent, dec!(-25));
        assert!(!metrics.is_profit());
    }

    #[test]
    fn test_zero_cost_basis_guard() {
        let position = InvestmentPosition::new(dec!(0.5), Decimal::ZERO);
        for price in [dec!(1), dec!(650000), dec!(0.00000001)] {
            let obs = PriceObservation::new(price, dec!(1));
            let metrics = DerivedMetrics::compute(&obs, &position).unwrap();
            assert_eq!(metrics.profit_percent, Decimal::ZERO);
            assert_eq!(metrics.profit, metrics.current_value);
        }
    }

    #[test]
    fn test_compute_is_pure() {
        let obs = PriceObservation::new(dec!(312345.67), dec!(0.42));
        let position = InvestmentPosition::new(dec!(0.03125), dec!(7000));

        let first = DerivedMetrics::compute(&obs, &position).unwrap();
        let second = DerivedMetrics::compute(&obs, &position).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tiny_cost_basis_overflows() {
        let obs = PriceObservation::new(dec!(650000), dec!(2.5));
        let position = InvestmentPosition::new(dec!(0.1), dec!(0.0000000000000000000000000001));

        assert_eq!(
            DerivedMetrics::compute(&obs, &position),
            Err(MetricsOverflow("profit_percent"))
        );
    }

    #[test]
    fn test_huge_holding_overflows() {
        let obs = PriceObservation::new(Decimal::MAX, dec!(0));
        let position = InvestmentPosition::new(dec!(2), dec!(1));

        assert_eq!(
            DerivedMetrics::compute(&obs, &position),
            Err(MetricsOverflow("current_value"))
        );
    }

    #[test]
    fn test_nothing_held() {
        let obs = PriceObservation::new(dec!(650000), dec!(2.5));
        let position = InvestmentPosition::new(Decimal::ZERO, dec!(1000));

        let metrics = DerivedMetrics::compute(&obs, &position).unwrap();
        assert_eq!(metrics.current_value, Decimal::ZERO);
        assert_eq!(metrics.profit_percent, dec!(-100));
    }
}
