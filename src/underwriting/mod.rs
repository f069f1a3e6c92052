//! Underwriting engine for single-deal and batch metric derivation

mod amortization;
mod cashflows;
mod engine;
mod irr;

pub use amortization::{monthly_payment, remaining_balance};
pub use cashflows::{AnnualCashflow, DerivedMetrics, UnderwritingSummary};
pub use engine::{
    CapRatePolicy, UnderwritingConfig, UnderwritingEngine, UnderwritingError,
    DEFAULT_EXIT_CAP_RATE, DEFAULT_NOI_GROWTH_RATE, DEFAULT_SALE_COSTS_PCT,
};
pub use irr::{
    calculate_irr, npv_at_rate, IrrFailure, IrrOutcome, IRR_DERIVATIVE_FLOOR, IRR_INITIAL_GUESS,
    IRR_MAX_ITERATIONS, IRR_NPV_TOLERANCE, IRR_RATE_TOLERANCE,
};
