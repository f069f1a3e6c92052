//! Underwriting System CLI
//!
//! Command-line interface for underwriting a single reference deal

use anyhow::Context;
use std::fs::File;
use std::io::Write;
use underwriting_system::{DealAssumptions, UnderwritingConfig, UnderwritingEngine};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Underwriting System v0.1.0");
    println!("==========================\n");

    // Reference deal: 200-unit garden-style acquisition
    let deal = DealAssumptions::new(
        200,         // total units
        4_100_000.0, // purchase price
        0.10,        // construction cost % of price
        0.03,        // closing costs % of price
        1_540.0,     // avg monthly rent
        0.40,        // operating expense ratio
        0.05,        // vacancy rate
        0.0,         // bad debt rate
        0.065,       // interest rate
        30,          // loan term (years)
        70.0,        // LTV %
        0.06,        // exit cap rate
        10,          // hold period (years)
    );

    println!("Deal Inputs:");
    println!("  Units: {}", deal.total_units);
    println!("  Purchase Price: ${:.0}", deal.purchase_price);
    println!("  Avg Monthly Rent: ${:.0}", deal.avg_monthly_rent);
    println!("  Financing: {:.2}% / {}yr at {:.0}% LTV", deal.interest_rate * 100.0, deal.loan_term_years, deal.ltv);
    println!("  Exit: {:.2}% cap after {} years", deal.exit_cap_rate * 100.0, deal.holding_period_years);
    println!();

    let engine = UnderwritingEngine::new(UnderwritingConfig::default());
    let metrics = engine.underwrite(&deal).context("underwriting failed")?;

    println!("Sources & Uses:");
    println!("  Total Project Cost: ${:.0}", metrics.total_project_cost);
    println!("  Loan Amount:        ${:.0}", metrics.loan_amount);
    println!("  Equity Required:    ${:.0}", metrics.equity_required);
    println!("  Annual Debt Service: ${:.0}", metrics.annual_debt_service);
    println!("  Year-1 NOI:          ${:.0}", metrics.net_operating_income);
    println!();

    // Print the annual pro forma
    println!("Annual Cash Flow Pro Forma:");
    println!("{:>5} {:>14} {:>14} {:>14} {:>8} {:>16} {:>16}",
        "Year", "NOI", "Debt Svc", "Op CF", "DSCR", "Sale Proceeds", "Net CF");
    println!("{}", "-".repeat(94));

    for row in &metrics.annual_cashflows {
        println!("{:>5} {:>14.0} {:>14.0} {:>14.0} {:>8} {:>16.0} {:>16.0}",
            row.year,
            row.noi,
            row.debt_service,
            row.cash_flow_before_sale,
            row.dscr.map_or_else(|| "n/a".to_string(), |d| format!("{:.2}x", d)),
            row.sale_proceeds,
            row.net_cash_flow,
        );
    }

    // Write full pro forma to CSV
    let csv_path = "underwriting_output.csv";
    let mut file = File::create(csv_path).context("Unable to create CSV file")?;

    writeln!(file, "Year,NOI,DebtService,CashFlowBeforeSale,DSCR,SaleProceeds,NetCashFlow")?;
    for row in &metrics.annual_cashflows {
        writeln!(file, "{},{:.2},{:.2},{:.2},{},{:.2},{:.2}",
            row.year,
            row.noi,
            row.debt_service,
            row.cash_flow_before_sale,
            row.dscr.map_or_else(String::new, |d| format!("{:.4}", d)),
            row.sale_proceeds,
            row.net_cash_flow,
        )?;
    }

    println!("\nFull pro forma written to: {}", csv_path);

    // Print exit and return metrics
    let summary = metrics.summary();
    println!("\nExit:");
    println!("  Gross Sale Price:  ${:.0}", metrics.sale_price);
    println!("  Loan Payoff:       ${:.0}", metrics.remaining_loan_balance_at_exit);
    println!("  Net Sale Proceeds: ${:.0}", metrics.sale_proceeds);

    println!("\nReturn Metrics:");
    match metrics.irr.percent() {
        Some(pct) if metrics.irr.is_converged() => println!("  Levered IRR: {:.2}%", pct),
        Some(pct) => println!("  Levered IRR: {:.2}% (non-converged)", pct),
        None => println!("  Levered IRR: undefined"),
    }
    println!("  Equity Multiple: {:.2}x", metrics.total_return);
    println!("  Yield on Cost: {:.2}%", metrics.yield_on_cost * 100.0);
    if let Some(coc) = summary.average_cash_on_cash {
        println!("  Avg Cash-on-Cash: {:.2}%", coc * 100.0);
    }
    if let Some(dscr) = metrics.dscr_year1 {
        println!("  Year-1 DSCR: {:.2}x", dscr);
    }

    Ok(())
}
