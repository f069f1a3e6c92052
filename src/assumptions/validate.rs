//! Untrusted input boundary for deal assumptions
//!
//! Import payloads, API requests, and pipeline rows arrive as loosely-typed
//! records; this module turns them into a [`DealAssumptions`] or a
//! structured validation error. The numeric engine never sees unvalidated
//! data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::deal::DealAssumptions;

fn default_construction_cost_pct() -> f64 { 0.10 }
fn default_closing_costs_pct() -> f64 { 0.03 }
fn default_operating_expense_ratio() -> f64 { 0.40 }
fn default_vacancy_rate() -> f64 { 0.05 }
fn default_bad_debt_rate() -> f64 { 0.01 }
fn default_interest_rate() -> f64 { 0.065 }
fn default_loan_term_years() -> u32 { 30 }
fn default_ltv() -> f64 { 70.0 }
fn default_exit_cap_rate() -> f64 { 0.06 }
fn default_holding_period_years() -> u32 { 10 }

/// Raw assumption record as supplied by a caller.
///
/// Only the property-level facts are required; every rate and term carries
/// the standard underwriting default so a sparse import payload still
/// produces a complete assumption set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssumptionsInput {
    pub total_units: u32,
    pub purchase_price: f64,
    pub avg_monthly_rent: f64,

    #[serde(default = "default_construction_cost_pct")]
    pub construction_cost_pct: f64,

    #[serde(default = "default_closing_costs_pct")]
    pub closing_costs_pct: f64,

    #[serde(default = "default_operating_expense_ratio")]
    pub operating_expense_ratio: f64,

    #[serde(default = "default_vacancy_rate")]
    pub vacancy_rate: f64,

    #[serde(default = "default_bad_debt_rate")]
    pub bad_debt_rate: f64,

    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,

    #[serde(default = "default_loan_term_years")]
    pub loan_term_years: u32,

    #[serde(default = "default_ltv")]
    pub ltv: f64,

    #[serde(default = "default_exit_cap_rate")]
    pub exit_cap_rate: f64,

    #[serde(default = "default_holding_period_years")]
    pub holding_period_years: u32,
}

/// A constraint violation in a raw assumption record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("ltv is a percentage and must lie in [0, 100], got {value}")]
    LtvOutOfRange { value: f64 },

    #[error("vacancy ({vacancy}) plus bad debt ({bad_debt}) cannot exceed 1.0")]
    CombinedLossExceedsOne { vacancy: f64, bad_debt: f64 },

    #[error("loan_term_years must be greater than zero")]
    ZeroLoanTerm,

    #[error("holding_period_years must be greater than zero")]
    ZeroHoldingPeriod,
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::FractionOutOfRange { field, value });
    }
    Ok(())
}

impl AssumptionsInput {
    /// Validate every field and produce an engine-ready assumption set.
    ///
    /// The exit cap rate is only checked for finiteness here: the (0, 1]
    /// range guard belongs to the engine, which owns the reject-vs-clamp
    /// policy for it.
    pub fn validate(self) -> Result<DealAssumptions, ValidationError> {
        check_amount("purchase_price", self.purchase_price)?;
        check_amount("avg_monthly_rent", self.avg_monthly_rent)?;

        check_fraction("construction_cost_pct", self.construction_cost_pct)?;
        check_fraction("closing_costs_pct", self.closing_costs_pct)?;
        check_fraction("operating_expense_ratio", self.operating_expense_ratio)?;
        check_fraction("vacancy_rate", self.vacancy_rate)?;
        check_fraction("bad_debt_rate", self.bad_debt_rate)?;
        check_fraction("interest_rate", self.interest_rate)?;

        if self.vacancy_rate + self.bad_debt_rate > 1.0 {
            return Err(ValidationError::CombinedLossExceedsOne {
                vacancy: self.vacancy_rate,
                bad_debt: self.bad_debt_rate,
            });
        }

        check_finite("ltv", self.ltv)?;
        if !(0.0..=100.0).contains(&self.ltv) {
            return Err(ValidationError::LtvOutOfRange { value: self.ltv });
        }

        check_finite("exit_cap_rate", self.exit_cap_rate)?;

        if self.loan_term_years == 0 {
            return Err(ValidationError::ZeroLoanTerm);
        }
        if self.holding_period_years == 0 {
            return Err(ValidationError::ZeroHoldingPeriod);
        }

        Ok(DealAssumptions {
            total_units: self.total_units,
            purchase_price: self.purchase_price,
            construction_cost_pct: self.construction_cost_pct,
            closing_costs_pct: self.closing_costs_pct,
            avg_monthly_rent: self.avg_monthly_rent,
            operating_expense_ratio: self.operating_expense_ratio,
            vacancy_rate: self.vacancy_rate,
            bad_debt_rate: self.bad_debt_rate,
            interest_rate: self.interest_rate,
            loan_term_years: self.loan_term_years,
            ltv: self.ltv,
            exit_cap_rate: self.exit_cap_rate,
            holding_period_years: self.holding_period_years,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> AssumptionsInput {
        serde_json::from_str(
            r#"{"total_units": 200, "purchase_price": 4100000, "avg_monthly_rent": 1540}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sparse_payload_fills_defaults() {
        let input = minimal_input();

        assert_eq!(input.loan_term_years, 30);
        assert_eq!(input.ltv, 70.0);
        assert_eq!(input.exit_cap_rate, 0.06);
        assert_eq!(input.holding_period_years, 10);

        let deal = input.validate().expect("defaults must validate");
        assert_eq!(deal.total_units, 200);
        assert_eq!(deal.vacancy_rate, 0.05);
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut input = minimal_input();
        input.purchase_price = -1.0;

        assert_eq!(
            input.validate(),
            Err(ValidationError::NegativeAmount { field: "purchase_price", value: -1.0 })
        );
    }

    #[test]
    fn test_rejects_out_of_range_fraction() {
        let mut input = minimal_input();
        input.vacancy_rate = 1.5;

        assert_eq!(
            input.validate(),
            Err(ValidationError::FractionOutOfRange { field: "vacancy_rate", value: 1.5 })
        );
    }

    #[test]
    fn test_rejects_combined_loss_over_one() {
        let mut input = minimal_input();
        input.vacancy_rate = 0.6;
        input.bad_debt_rate = 0.5;

        assert!(matches!(
            input.validate(),
            Err(ValidationError::CombinedLossExceedsOne { .. })
        ));
    }

    #[test]
    fn test_rejects_fractional_looking_ltv_above_100() {
        let mut input = minimal_input();
        input.ltv = 170.0;

        assert_eq!(input.validate(), Err(ValidationError::LtvOutOfRange { value: 170.0 }));
    }

    #[test]
    fn test_rejects_non_finite_rent() {
        let mut input = minimal_input();
        input.avg_monthly_rent = f64::NAN;

        assert!(matches!(
            input.validate(),
            Err(ValidationError::NonFinite { field: "avg_monthly_rent", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_terms() {
        let mut input = minimal_input();
        input.loan_term_years = 0;
        assert_eq!(input.validate(), Err(ValidationError::ZeroLoanTerm));

        let mut input = minimal_input();
        input.holding_period_years = 0;
        assert_eq!(input.validate(), Err(ValidationError::ZeroHoldingPeriod));
    }

    #[test]
    fn test_out_of_range_cap_rate_passes_boundary() {
        // Range policy for the cap rate lives in the engine, not here
        let mut input = minimal_input();
        input.exit_cap_rate = -0.05;

        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_zero_interest_is_valid() {
        let mut input = minimal_input();
        input.interest_rate = 0.0;

        assert!(input.validate().is_ok());
    }
}
