//! Internal Rate of Return (IRR) calculation
//!
//! Solves NPV(rate) = 0 for the levered equity cash-flow stream via
//! Newton-Raphson, with explicit outcomes for every failure mode so that
//! NaN/Infinity never leak into reported metrics.

use serde::{Deserialize, Serialize};

/// Starting point for the Newton-Raphson iteration (10% is the
/// conventional first guess for levered real-estate returns).
pub const IRR_INITIAL_GUESS: f64 = 0.10;

/// Accept the current rate once |NPV| falls below this threshold.
pub const IRR_NPV_TOLERANCE: f64 = 1e-5;

/// Accept the updated rate once the step size falls below this threshold.
pub const IRR_RATE_TOLERANCE: f64 = 1e-5;

/// Smallest derivative magnitude the update step may divide by.
pub const IRR_DERIVATIVE_FLOOR: f64 = 1e-7;

/// Hard cap on Newton-Raphson iterations.
pub const IRR_MAX_ITERATIONS: u32 = 1000;

/// Why the solver could not produce a converged rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrFailure {
    /// Cash flows are all inflows or all outflows; no root exists
    NoSignChange,
    /// NPV derivative underflowed; the update step would divide by ~0
    DerivativeUnderflow,
    /// Iteration produced a non-finite rate
    Diverged,
    /// Empty cash-flow stream
    EmptyStream,
}

/// Result of an IRR solve, in decimal fraction terms (0.08 = 8%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IrrOutcome {
    /// Root found within tolerance
    Converged { rate: f64, iterations: u32 },
    /// Iteration cap hit; `last_rate` is the final iterate and must not be
    /// presented with the same confidence as a converged result
    NonConverged { last_rate: f64 },
    /// No rate can be reported at all
    Undefined { reason: IrrFailure },
}

impl IrrOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, IrrOutcome::Converged { .. })
    }

    /// Best available rate as a decimal fraction, if any
    pub fn rate(&self) -> Option<f64> {
        match self {
            IrrOutcome::Converged { rate, .. } => Some(*rate),
            IrrOutcome::NonConverged { last_rate } => Some(*last_rate),
            IrrOutcome::Undefined { .. } => None,
        }
    }

    /// Best available rate as a display percentage (x100)
    pub fn percent(&self) -> Option<f64> {
        self.rate().map(|r| r * 100.0)
    }
}

/// Solve for the annual IRR of a cash-flow stream using Newton-Raphson.
///
/// `cashflows[0]` is the initial (negative) equity outlay; `cashflows[1..]`
/// are the annual flows to equity, with sale proceeds already folded into
/// the final element.
pub fn calculate_irr(cashflows: &[f64]) -> IrrOutcome {
    if cashflows.is_empty() {
        return IrrOutcome::Undefined { reason: IrrFailure::EmptyStream };
    }

    // An all-zero stream is degenerate but harmless; 0% discounts it to zero
    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return IrrOutcome::Converged { rate: 0.0, iterations: 0 };
    }

    // A root requires at least one sign change
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return IrrOutcome::Undefined { reason: IrrFailure::NoSignChange };
    }

    let mut rate = IRR_INITIAL_GUESS;

    for iteration in 1..=IRR_MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if npv.abs() < IRR_NPV_TOLERANCE {
            return IrrOutcome::Converged { rate, iterations: iteration };
        }

        if dnpv.abs() < IRR_DERIVATIVE_FLOOR {
            return IrrOutcome::Undefined { reason: IrrFailure::DerivativeUnderflow };
        }

        let new_rate = rate - npv / dnpv;

        if !new_rate.is_finite() {
            return IrrOutcome::Undefined { reason: IrrFailure::Diverged };
        }

        if (new_rate - rate).abs() < IRR_RATE_TOLERANCE {
            return IrrOutcome::Converged { rate: new_rate, iterations: iteration };
        }

        rate = new_rate;
    }

    IrrOutcome::NonConverged { last_rate: rate }
}

/// NPV and its derivative with respect to rate, in one pass
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

/// NPV of a stream at a fixed annual rate
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_period_round_trip() {
        // -100 now, +110 in one year: exact root at 10%
        let outcome = calculate_irr(&[-100.0, 110.0]);
        let rate = outcome.rate().expect("should produce a rate");
        assert!(outcome.is_converged());
        assert!((rate - 0.10).abs() < 1e-4, "expected ~10%, got {}", rate);
    }

    #[test]
    fn test_multi_period_known_root() {
        // -1000 then five years of 300: IRR ~ 15.24%
        let outcome = calculate_irr(&[-1000.0, 300.0, 300.0, 300.0, 300.0, 300.0]);
        let rate = outcome.rate().unwrap();
        assert!(outcome.is_converged());
        assert!((rate - 0.1524).abs() < 0.001, "expected ~15.24%, got {}", rate);

        // The recovered rate really is a root
        assert!(npv_at_rate(&[-1000.0, 300.0, 300.0, 300.0, 300.0, 300.0], rate).abs() < 1e-2);
    }

    #[test]
    fn test_negative_irr() {
        // Losing deal: -1000 back as 900 after one year => -10%
        let outcome = calculate_irr(&[-1000.0, 900.0]);
        let rate = outcome.rate().unwrap();
        assert!((rate + 0.10).abs() < 1e-4, "expected ~-10%, got {}", rate);
    }

    #[test]
    fn test_no_sign_change_is_undefined() {
        let outcome = calculate_irr(&[100.0, 200.0, 300.0]);
        assert_eq!(outcome, IrrOutcome::Undefined { reason: IrrFailure::NoSignChange });
        assert_eq!(outcome.rate(), None);

        let outcome = calculate_irr(&[-100.0, -200.0]);
        assert_eq!(outcome, IrrOutcome::Undefined { reason: IrrFailure::NoSignChange });
    }

    #[test]
    fn test_empty_and_zero_streams() {
        assert_eq!(calculate_irr(&[]), IrrOutcome::Undefined { reason: IrrFailure::EmptyStream });

        let outcome = calculate_irr(&[0.0, 0.0, 0.0]);
        assert_eq!(outcome.rate(), Some(0.0));
        assert!(outcome.is_converged());
    }

    #[test]
    fn test_outcome_never_yields_non_finite() {
        // Pathological streams may fail, but any reported rate is finite
        let streams: [&[f64]; 4] = [
            &[-1.0, 0.0, 0.0, 1e18],
            &[-1e-9, 1e18],
            &[-100.0, 110.0],
            &[1.0, -2.0, 1.0],
        ];
        for flows in streams {
            if let Some(rate) = calculate_irr(flows).rate() {
                assert!(rate.is_finite());
            }
        }
    }

    #[test]
    fn test_percent_conversion() {
        let outcome = calculate_irr(&[-100.0, 110.0]);
        let pct = outcome.percent().unwrap();
        assert!((pct - 10.0).abs() < 0.01);
    }
}
