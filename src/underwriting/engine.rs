//! Core underwriting engine: sources & uses, debt sizing, annual pro forma,
//! exit reversion, and levered return metrics
//!
//! This is the single authoritative implementation of the deal math; every
//! surface (CLI, batch, Lambda, export) prices through it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assumptions::DealAssumptions;
use super::amortization::{monthly_payment, remaining_balance};
use super::cashflows::{AnnualCashflow, DerivedMetrics};
use super::irr::calculate_irr;

/// Annual NOI escalation applied from year 2 onward
pub const DEFAULT_NOI_GROWTH_RATE: f64 = 0.02;

/// Transaction costs at sale, as a fraction of gross sale price. The core
/// reversion contract is gross of sale costs, so the default config leaves
/// this at zero; callers wanting the full workbook treatment opt in.
pub const DEFAULT_SALE_COSTS_PCT: f64 = 0.04;

/// Fallback exit cap rate under [`CapRatePolicy::ClampToDefault`]
pub const DEFAULT_EXIT_CAP_RATE: f64 = 0.06;

/// How to treat an exit cap rate outside (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapRatePolicy {
    /// Fail the computation with a descriptive error
    #[default]
    Reject,
    /// Substitute [`DEFAULT_EXIT_CAP_RATE`] and proceed
    ClampToDefault,
}

/// Tunable engine policy; the defaults reproduce the standard pro forma
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingConfig {
    /// Annual NOI growth applied from year 2 onward
    #[serde(default = "default_noi_growth")]
    pub noi_growth_rate: f64,

    /// Sale-cost haircut on the gross sale price (0 = gross of costs)
    #[serde(default)]
    pub sale_costs_pct: f64,

    /// Policy for exit cap rates outside (0, 1]
    #[serde(default)]
    pub cap_rate_policy: CapRatePolicy,
}

fn default_noi_growth() -> f64 {
    DEFAULT_NOI_GROWTH_RATE
}

impl Default for UnderwritingConfig {
    fn default() -> Self {
        Self {
            noi_growth_rate: DEFAULT_NOI_GROWTH_RATE,
            sale_costs_pct: 0.0,
            cap_rate_policy: CapRatePolicy::Reject,
        }
    }
}

/// Computation-domain failures. Business-normal outcomes (negative cash
/// flow years, non-converged IRR) are values, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnderwritingError {
    #[error("exit cap rate must lie in (0, 1], got {value}")]
    InvalidExitCapRate { value: f64 },
}

/// Main underwriting engine
#[derive(Debug, Clone, Default)]
pub struct UnderwritingEngine {
    config: UnderwritingConfig,
}

impl UnderwritingEngine {
    /// Create an engine with the given policy config
    pub fn new(config: UnderwritingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UnderwritingConfig {
        &self.config
    }

    /// Underwrite a single deal: derive every metric from the assumption
    /// set. Pure and deterministic; identical inputs reproduce identical
    /// outputs bit for bit.
    pub fn underwrite(&self, deal: &DealAssumptions) -> Result<DerivedMetrics, UnderwritingError> {
        let exit_cap_rate = self.resolve_exit_cap_rate(deal.exit_cap_rate)?;

        // Sources & uses
        let total_project_cost = deal.total_project_cost();
        let loan_amount = deal.loan_amount();
        let equity_required = total_project_cost - loan_amount;

        // Debt service: PMT returns the payment as a negative outflow;
        // report the annual magnitude
        let monthly_rate = deal.monthly_rate();
        let total_periods = deal.amortization_periods();
        let payment = monthly_payment(monthly_rate, total_periods, loan_amount);
        let annual_debt_service = payment.abs() * 12.0;

        // Annual pro forma
        let noi_year1 = deal.stabilized_noi();
        let hold_years = deal.holding_period_years;
        let growth = 1.0 + self.config.noi_growth_rate;

        let mut rows = Vec::with_capacity(hold_years as usize);
        for year in 1..=hold_years {
            let noi = noi_year1 * growth.powi(year as i32 - 1);
            let cash_flow_before_sale = noi - annual_debt_service;
            let dscr = if annual_debt_service > 0.0 {
                Some(noi / annual_debt_service)
            } else {
                None
            };

            rows.push(AnnualCashflow {
                year,
                noi,
                debt_service: annual_debt_service,
                cash_flow_before_sale,
                dscr,
                sale_proceeds: 0.0,
                net_cash_flow: cash_flow_before_sale,
            });
        }

        // Exit reversion: forward NOI is one escalation step past the final
        // hold year, capped into a gross sale price
        let exit_noi = noi_year1 * growth.powi(hold_years as i32);
        let sale_price = exit_noi / exit_cap_rate;
        let remaining_loan_balance_at_exit =
            remaining_balance(loan_amount, monthly_rate, total_periods, hold_years * 12);
        let sale_proceeds =
            sale_price * (1.0 - self.config.sale_costs_pct) - remaining_loan_balance_at_exit;

        // Proceeds fold into the final operating year, never a separate period
        if let Some(last) = rows.last_mut() {
            last.sale_proceeds = sale_proceeds;
            last.net_cash_flow += sale_proceeds;
        }

        // Levered IRR over [-equity, cf_1 .. cf_n]
        let mut stream = Vec::with_capacity(rows.len() + 1);
        stream.push(-equity_required);
        stream.extend(rows.iter().map(|row| row.net_cash_flow));
        let irr = calculate_irr(&stream);

        if !irr.is_converged() {
            log::warn!("IRR did not converge: {:?}", irr);
        }

        // Equity multiple from the same rows the solver discounted
        let total_distributions: f64 = rows.iter().map(|row| row.net_cash_flow).sum();
        let total_return = if equity_required > 0.0 {
            total_distributions / equity_required
        } else {
            // Zero-equity structure: the multiple is not meaningful
            0.0
        };

        let dscr_year1 = rows.first().and_then(|row| row.dscr);

        Ok(DerivedMetrics {
            total_project_cost,
            loan_amount,
            equity_required,
            annual_debt_service,
            net_operating_income: noi_year1,
            annual_cashflows: rows,
            sale_price,
            remaining_loan_balance_at_exit,
            sale_proceeds,
            irr,
            total_return,
            yield_on_cost: if total_project_cost > 0.0 {
                noi_year1 / total_project_cost
            } else {
                0.0
            },
            dscr_year1,
        })
    }

    /// Apply the configured policy to an out-of-range exit cap rate
    fn resolve_exit_cap_rate(&self, value: f64) -> Result<f64, UnderwritingError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            return Ok(value);
        }

        match self.config.cap_rate_policy {
            CapRatePolicy::Reject => Err(UnderwritingError::InvalidExitCapRate { value }),
            CapRatePolicy::ClampToDefault => {
                log::warn!(
                    "exit cap rate {} outside (0, 1]; clamping to default {}",
                    value,
                    DEFAULT_EXIT_CAP_RATE
                );
                Ok(DEFAULT_EXIT_CAP_RATE)
            }
        }
    }
}
