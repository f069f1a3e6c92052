//! Validated deal assumptions consumed by the underwriting engine

use serde::{Deserialize, Serialize};

/// The complete assumption set for one underwriting run.
///
/// Immutable per computation: the engine derives every metric from this
/// record alone, so identical assumptions always reproduce identical
/// metrics. Untrusted data reaches this type only through
/// [`AssumptionsInput::validate`](super::AssumptionsInput::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAssumptions {
    /// Total unit count across the property
    pub total_units: u32,

    /// Purchase price in dollars
    pub purchase_price: f64,

    /// Construction/renovation budget as a fraction of purchase price
    pub construction_cost_pct: f64,

    /// Closing costs as a fraction of purchase price
    pub closing_costs_pct: f64,

    /// Average monthly rent per unit in dollars
    pub avg_monthly_rent: f64,

    /// Operating expenses as a fraction of effective gross income
    pub operating_expense_ratio: f64,

    /// Vacancy loss as a fraction of gross potential rent
    pub vacancy_rate: f64,

    /// Bad-debt loss as a fraction of gross potential rent
    pub bad_debt_rate: f64,

    /// Annual interest rate as a decimal fraction (0 allowed)
    pub interest_rate: f64,

    /// Amortization horizon in years
    pub loan_term_years: u32,

    /// Loan-to-value ratio in PERCENT (0-100), applied to total project cost
    pub ltv: f64,

    /// Exit capitalization rate as a decimal fraction; the engine guards
    /// the (0, 1] range at computation time
    pub exit_cap_rate: f64,

    /// Hold period in years; may exceed the loan term (loan gets retired)
    pub holding_period_years: u32,
}

impl DealAssumptions {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        total_units: u32,
        purchase_price: f64,
        construction_cost_pct: f64,
        closing_costs_pct: f64,
        avg_monthly_rent: f64,
        operating_expense_ratio: f64,
        vacancy_rate: f64,
        bad_debt_rate: f64,
        interest_rate: f64,
        loan_term_years: u32,
        ltv: f64,
        exit_cap_rate: f64,
        holding_period_years: u32,
    ) -> Self {
        Self {
            total_units,
            purchase_price,
            construction_cost_pct,
            closing_costs_pct,
            avg_monthly_rent,
            operating_expense_ratio,
            vacancy_rate,
            bad_debt_rate,
            interest_rate,
            loan_term_years,
            ltv,
            exit_cap_rate,
            holding_period_years,
        }
    }

    /// Annual gross potential rent: all units at full rent, no loss
    pub fn gross_potential_rent(&self) -> f64 {
        self.total_units as f64 * self.avg_monthly_rent * 12.0
    }

    /// Effective gross income: GPR less vacancy and bad-debt loss
    /// (loss fractions sum linearly against GPR)
    pub fn effective_gross_income(&self) -> f64 {
        self.gross_potential_rent() * (1.0 - self.vacancy_rate - self.bad_debt_rate)
    }

    /// Year-1 stabilized net operating income
    pub fn stabilized_noi(&self) -> f64 {
        self.effective_gross_income() * (1.0 - self.operating_expense_ratio)
    }

    /// Purchase price grossed up by construction and closing costs
    pub fn total_project_cost(&self) -> f64 {
        self.purchase_price * (1.0 + self.construction_cost_pct + self.closing_costs_pct)
    }

    /// Loan proceeds at LTV against total project cost
    pub fn loan_amount(&self) -> f64 {
        self.total_project_cost() * self.ltv / 100.0
    }

    /// Monthly periodic rate for the amortization schedule
    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / 12.0
    }

    /// Total amortization periods (months)
    pub fn amortization_periods(&self) -> u32 {
        self.loan_term_years * 12
    }
}
