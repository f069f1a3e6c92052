//! Loan amortization math: periodic payment and remaining balance
//!
//! Matches the Excel debt schedule conventions (`PMT`, monthly roll-forward)

/// Constant periodic payment that amortizes `principal` to zero over
/// `periods` payments at the periodic rate `rate`.
///
/// Returns the payment as a NEGATIVE cash outflow, matching Excel's `PMT`
/// sign convention. Callers report debt service as the absolute value.
///
/// Contract: `periods > 0`. Zero periods is a caller violation; the engine
/// validates loan terms before ever reaching this function. A zero rate
/// degrades to straight-line repayment.
pub fn monthly_payment(rate: f64, periods: u32, principal: f64) -> f64 {
    debug_assert!(periods > 0, "amortization requires at least one period");

    if rate == 0.0 {
        return -(principal / periods as f64);
    }

    let factor = (1.0 + rate).powi(periods as i32);
    -(rate * principal * factor / (factor - 1.0))
}

/// Outstanding principal after `payments_made` of `total_periods` payments.
///
/// Fully retired loans report exactly zero, so an exit after the
/// amortization horizon never shows a residual payoff.
pub fn remaining_balance(principal: f64, rate: f64, total_periods: u32, payments_made: u32) -> f64 {
    if payments_made >= total_periods {
        return 0.0;
    }

    if rate == 0.0 {
        // Straight-line: principal retires evenly each period
        return principal * (total_periods - payments_made) as f64 / total_periods as f64;
    }

    let grown_total = (1.0 + rate).powi(total_periods as i32);
    let grown_made = (1.0 + rate).powi(payments_made as i32);
    principal * (grown_total - grown_made) / (grown_total - 1.0)
}
