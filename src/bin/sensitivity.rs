//! Exit-cap and NOI-growth sensitivity grid for a single deal
//!
//! Supports JSON output for API integration via --json flag
//! Accepts the deal via environment variables:
//!   TOTAL_UNITS, PURCHASE_PRICE, AVG_MONTHLY_RENT, CONSTRUCTION_COST_PCT,
//!   CLOSING_COSTS_PCT, OPERATING_EXPENSE_RATIO, VACANCY_RATE, BAD_DEBT_RATE,
//!   INTEREST_RATE, LOAN_TERM_YEARS, LTV, HOLDING_PERIOD_YEARS
//! Grid bounds: EXIT_CAP_MIN, EXIT_CAP_MAX, EXIT_CAP_STEPS,
//!   NOI_GROWTH_MIN, NOI_GROWTH_MAX, NOI_GROWTH_STEPS

use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;
use underwriting_system::{DealAssumptions, UnderwritingConfig, UnderwritingEngine};

#[derive(Serialize)]
struct SensitivityResponse {
    deal: DealAssumptions,
    grid: Vec<GridCell>,
    execution_time_ms: u64,
}

#[derive(Serialize, Clone)]
struct GridCell {
    exit_cap_rate: f64,
    noi_growth_rate: f64,
    irr_pct: Option<f64>,
    irr_converged: bool,
    equity_multiple: Option<f64>,
    sale_price: Option<f64>,
    error: Option<String>,
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Evenly spaced grid axis, inclusive of both bounds
fn axis(min: f64, max: f64, steps: u32) -> Vec<f64> {
    if steps <= 1 {
        return vec![min];
    }
    let width = (max - min) / (steps - 1) as f64;
    (0..steps).map(|i| min + width * i as f64).collect()
}

fn main() {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let deal = DealAssumptions::new(
        env_u32("TOTAL_UNITS", 200),
        env_f64("PURCHASE_PRICE", 4_100_000.0),
        env_f64("CONSTRUCTION_COST_PCT", 0.10),
        env_f64("CLOSING_COSTS_PCT", 0.03),
        env_f64("AVG_MONTHLY_RENT", 1_540.0),
        env_f64("OPERATING_EXPENSE_RATIO", 0.40),
        env_f64("VACANCY_RATE", 0.05),
        env_f64("BAD_DEBT_RATE", 0.0),
        env_f64("INTEREST_RATE", 0.065),
        env_u32("LOAN_TERM_YEARS", 30),
        env_f64("LTV", 70.0),
        0.06, // overwritten per grid cell
        env_u32("HOLDING_PERIOD_YEARS", 10),
    );

    let caps = axis(
        env_f64("EXIT_CAP_MIN", 0.045),
        env_f64("EXIT_CAP_MAX", 0.075),
        env_u32("EXIT_CAP_STEPS", 7),
    );
    let growths = axis(
        env_f64("NOI_GROWTH_MIN", 0.00),
        env_f64("NOI_GROWTH_MAX", 0.04),
        env_u32("NOI_GROWTH_STEPS", 5),
    );

    let cells: Vec<(f64, f64)> = caps
        .iter()
        .flat_map(|&cap| growths.iter().map(move |&g| (cap, g)))
        .collect();

    log::info!("pricing {} grid cells", cells.len());

    let grid: Vec<GridCell> = cells
        .par_iter()
        .map(|&(cap, growth)| {
            let mut variant = deal.clone();
            variant.exit_cap_rate = cap;

            let config = UnderwritingConfig { noi_growth_rate: growth, ..Default::default() };
            match UnderwritingEngine::new(config).underwrite(&variant) {
                Ok(metrics) => GridCell {
                    exit_cap_rate: cap,
                    noi_growth_rate: growth,
                    irr_pct: metrics.irr.percent(),
                    irr_converged: metrics.irr.is_converged(),
                    equity_multiple: Some(metrics.total_return),
                    sale_price: Some(metrics.sale_price),
                    error: None,
                },
                Err(err) => GridCell {
                    exit_cap_rate: cap,
                    noi_growth_rate: growth,
                    irr_pct: None,
                    irr_converged: false,
                    equity_multiple: None,
                    sale_price: None,
                    error: Some(err.to_string()),
                },
            }
        })
        .collect();

    let execution_time_ms = start.elapsed().as_millis() as u64;

    if json_output {
        let response = SensitivityResponse { deal, grid, execution_time_ms };
        println!("{}", serde_json::to_string_pretty(&response).unwrap());
        return;
    }

    println!("Sensitivity Grid: levered IRR % by exit cap x NOI growth");
    print!("{:>10}", "cap \\ g");
    for growth in &growths {
        print!("{:>10.1}%", growth * 100.0);
    }
    println!();

    for &cap in &caps {
        print!("{:>9.2}%", cap * 100.0);
        for &growth in &growths {
            let cell = grid
                .iter()
                .find(|c| c.exit_cap_rate == cap && c.noi_growth_rate == growth)
                .expect("grid covers every cell");
            match cell.irr_pct {
                Some(pct) if cell.irr_converged => print!("{:>11.2}", pct),
                Some(pct) => print!("{:>10.2}*", pct),
                None => print!("{:>11}", "--"),
            }
        }
        println!();
    }

    println!("\n(* = non-converged, -- = undefined)");
    println!("Total time: {:?}", start.elapsed());
}
