//! Scenario runner for efficient batch underwriting
//!
//! Holds a base engine config so many deals or config variants can be
//! priced without rebuilding policy state per call.

use crate::assumptions::DealAssumptions;
use crate::underwriting::{
    DerivedMetrics, UnderwritingConfig, UnderwritingEngine, UnderwritingError,
};

/// One point of a sensitivity sweep: the swept input value and its outcome
#[derive(Debug, Clone)]
pub struct SensitivityPoint {
    pub value: f64,
    pub metrics: Result<DerivedMetrics, UnderwritingError>,
}

/// Pre-configured scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// for cap in [0.05, 0.055, 0.06] {
///     let mut variant = deal.clone();
///     variant.exit_cap_rate = cap;
///     let metrics = runner.run(&variant)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_config: UnderwritingConfig,
}

impl ScenarioRunner {
    /// Create a runner with the default engine config
    pub fn new() -> Self {
        Self { base_config: UnderwritingConfig::default() }
    }

    /// Create a runner with a custom base config
    pub fn with_config(config: UnderwritingConfig) -> Self {
        Self { base_config: config }
    }

    /// Underwrite a single deal with the base config
    pub fn run(&self, deal: &DealAssumptions) -> Result<DerivedMetrics, UnderwritingError> {
        UnderwritingEngine::new(self.base_config).underwrite(deal)
    }

    /// Underwrite many deals with the same config
    pub fn run_batch(
        &self,
        deals: &[DealAssumptions],
    ) -> Vec<Result<DerivedMetrics, UnderwritingError>> {
        let engine = UnderwritingEngine::new(self.base_config);
        deals.iter().map(|deal| engine.underwrite(deal)).collect()
    }

    /// Underwrite one deal under several config variants
    pub fn run_scenarios(
        &self,
        deal: &DealAssumptions,
        configs: &[UnderwritingConfig],
    ) -> Vec<Result<DerivedMetrics, UnderwritingError>> {
        configs
            .iter()
            .map(|config| UnderwritingEngine::new(*config).underwrite(deal))
            .collect()
    }

    /// Sweep the exit cap rate across the given values
    pub fn exit_cap_sensitivity(
        &self,
        deal: &DealAssumptions,
        cap_rates: &[f64],
    ) -> Vec<SensitivityPoint> {
        cap_rates
            .iter()
            .map(|&cap| {
                let mut variant = deal.clone();
                variant.exit_cap_rate = cap;
                SensitivityPoint { value: cap, metrics: self.run(&variant) }
            })
            .collect()
    }

    /// Sweep the NOI growth rate across the given values
    pub fn growth_sensitivity(
        &self,
        deal: &DealAssumptions,
        growth_rates: &[f64],
    ) -> Vec<SensitivityPoint> {
        growth_rates
            .iter()
            .map(|&growth| {
                let config = UnderwritingConfig { noi_growth_rate: growth, ..self.base_config };
                SensitivityPoint {
                    value: growth,
                    metrics: UnderwritingEngine::new(config).underwrite(deal),
                }
            })
            .collect()
    }

    /// Get the base config for inspection
    pub fn config(&self) -> &UnderwritingConfig {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_deal() -> DealAssumptions {
        DealAssumptions::new(
            200, 4_100_000.0, 0.10, 0.03, 1_540.0, 0.40, 0.05, 0.0, 0.065, 30, 70.0, 0.06, 10,
        )
    }

    #[test]
    fn test_exit_cap_sensitivity_ordering() {
        let runner = ScenarioRunner::new();
        let points = runner.exit_cap_sensitivity(&test_deal(), &[0.05, 0.06, 0.07]);

        assert_eq!(points.len(), 3);
        let sale_prices: Vec<f64> = points
            .iter()
            .map(|p| p.metrics.as_ref().unwrap().sale_price)
            .collect();

        // Lower exit cap means a richer sale price, and for this deal a
        // better levered return
        assert!(sale_prices[0] > sale_prices[1]);
        assert!(sale_prices[1] > sale_prices[2]);

        let irrs: Vec<f64> = points
            .iter()
            .map(|p| p.metrics.as_ref().unwrap().irr.percent().unwrap())
            .collect();
        assert!(irrs[0] > irrs[1] && irrs[1] > irrs[2]);
    }

    #[test]
    fn test_growth_sensitivity_monotone_for_reference_deal() {
        let runner = ScenarioRunner::new();
        let points = runner.growth_sensitivity(&test_deal(), &[0.0, 0.02, 0.04]);

        let multiples: Vec<f64> = points
            .iter()
            .map(|p| p.metrics.as_ref().unwrap().total_return)
            .collect();
        assert!(multiples[0] < multiples[1] && multiples[1] < multiples[2]);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ScenarioRunner::new();
        let deals = vec![test_deal(), test_deal()];

        let batch = runner.run_batch(&deals);
        let single = runner.run(&deals[0]).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(*batch[0].as_ref().unwrap(), single);
        assert_eq!(*batch[1].as_ref().unwrap(), single);
    }

    #[test]
    fn test_invalid_cap_in_sweep_is_isolated() {
        let runner = ScenarioRunner::new();
        let points = runner.exit_cap_sensitivity(&test_deal(), &[0.06, 0.0]);

        assert!(points[0].metrics.is_ok());
        assert!(points[1].metrics.is_err());
    }
}
