//! Pro-forma output structures for underwriting runs

use serde::{Deserialize, Serialize};

use super::irr::IrrOutcome;

/// A single year of the annual cash-flow pro forma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualCashflow {
    /// Hold year, 1-indexed (year 1 is the first full year of operations)
    pub year: u32,

    /// Net operating income for the year, after vacancy, bad debt, and
    /// operating expenses
    pub noi: f64,

    /// Annual debt service (positive outflow magnitude, constant across the
    /// hold for a fixed-rate fully amortizing note)
    pub debt_service: f64,

    /// NOI less debt service
    pub cash_flow_before_sale: f64,

    /// Debt service coverage ratio (NOI / debt service); None for an
    /// all-equity deal with no debt service
    pub dscr: Option<f64>,

    /// Net sale proceeds to equity; zero except in the exit year
    pub sale_proceeds: f64,

    /// Total cash flow to equity for the year
    pub net_cash_flow: f64,
}

/// Complete set of derived metrics for one deal
///
/// A pure function of the assumptions and engine config: no caller should
/// treat a stored copy as authoritative, it is always recomputable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Purchase price grossed up by construction and closing costs
    pub total_project_cost: f64,

    /// Loan sized at LTV against total project cost
    pub loan_amount: f64,

    /// Equity required to close: total project cost less loan proceeds
    pub equity_required: f64,

    /// Monthly payment x 12, stated as a positive outflow magnitude
    pub annual_debt_service: f64,

    /// Year-1 stabilized net operating income
    pub net_operating_income: f64,

    /// One row per hold year; index 0 = year 1
    pub annual_cashflows: Vec<AnnualCashflow>,

    /// Gross sale price at exit (forward NOI / exit cap rate)
    pub sale_price: f64,

    /// Loan payoff due at the hold-period boundary
    pub remaining_loan_balance_at_exit: f64,

    /// Sale price (net of any configured sale costs) less loan payoff
    pub sale_proceeds: f64,

    /// Levered IRR of the equity cash-flow stream
    pub irr: IrrOutcome,

    /// Equity multiple: total distributions / equity required
    pub total_return: f64,

    /// Stabilized NOI over total project cost
    pub yield_on_cost: f64,

    /// Year-1 DSCR; None for an all-equity deal
    pub dscr_year1: Option<f64>,
}

impl DerivedMetrics {
    /// The stream handed to the IRR solver: year 0 equity outlay followed
    /// by the annual flows. Rebuilt from the same rows that priced the
    /// equity multiple, so the two can never drift apart.
    pub fn equity_cashflow_stream(&self) -> Vec<f64> {
        let mut stream = Vec::with_capacity(self.annual_cashflows.len() + 1);
        stream.push(-self.equity_required);
        stream.extend(self.annual_cashflows.iter().map(|row| row.net_cash_flow));
        stream
    }

    /// Summary statistics across the hold
    pub fn summary(&self) -> UnderwritingSummary {
        let total_operating_cf: f64 = self
            .annual_cashflows
            .iter()
            .map(|row| row.cash_flow_before_sale)
            .sum();
        let total_distributions: f64 =
            self.annual_cashflows.iter().map(|row| row.net_cash_flow).sum();

        let hold_years = self.annual_cashflows.len() as u32;
        let average_cash_on_cash = if self.equity_required > 0.0 && hold_years > 0 {
            Some(total_operating_cf / hold_years as f64 / self.equity_required)
        } else {
            None
        };

        let negative_cashflow_years = self
            .annual_cashflows
            .iter()
            .filter(|row| row.cash_flow_before_sale < 0.0)
            .count() as u32;

        UnderwritingSummary {
            hold_years,
            total_operating_cf,
            total_distributions,
            average_cash_on_cash,
            negative_cashflow_years,
            irr_pct: self.irr.percent(),
            equity_multiple: self.total_return,
        }
    }
}

/// Summary statistics for an underwriting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingSummary {
    pub hold_years: u32,
    pub total_operating_cf: f64,
    pub total_distributions: f64,
    /// Average pre-sale cash flow over equity invested
    pub average_cash_on_cash: Option<f64>,
    /// Count of hold years with negative operating cash flow (legitimate
    /// for value-add deals, surfaced for the risk panel)
    pub negative_cashflow_years: u32,
    pub irr_pct: Option<f64>,
    pub equity_multiple: f64,
}
