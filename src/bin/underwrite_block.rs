//! Underwrite an entire acquisition pipeline from a deals CSV
//!
//! Outputs per-deal metrics for comparison across the pipeline

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use underwriting_system::{
    deal::load_deals, Deal, DealStatus, DerivedMetrics, UnderwritingConfig, UnderwritingEngine,
    UnderwritingError,
};

#[derive(Parser, Debug)]
#[command(name = "underwrite_block", about = "Batch-underwrite a deal pipeline CSV")]
struct Args {
    /// Pipeline CSV to load
    #[arg(long, default_value = "deal_pipeline.csv")]
    input: PathBuf,

    /// Per-deal metrics CSV to write
    #[arg(long, default_value = "block_underwriting_output.csv")]
    output: PathBuf,

    /// Only underwrite deals with this status (potential/ongoing/completed/rejected)
    #[arg(long)]
    status: Option<String>,

    /// Sale-cost fraction applied to the gross sale price
    #[arg(long, default_value_t = 0.0)]
    sale_costs_pct: f64,

    /// Annual NOI growth rate
    #[arg(long, default_value_t = underwriting_system::underwriting::DEFAULT_NOI_GROWTH_RATE)]
    noi_growth: f64,
}

struct DealResult {
    deal_id: u32,
    property_name: String,
    outcome: Result<DerivedMetrics, BlockError>,
}

enum BlockError {
    Validation(String),
    Underwriting(UnderwritingError),
}

impl std::fmt::Display for BlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockError::Validation(msg) => write!(f, "validation: {}", msg),
            BlockError::Underwriting(err) => write!(f, "underwriting: {}", err),
        }
    }
}

fn underwrite_deal(engine: &UnderwritingEngine, deal: &Deal) -> DealResult {
    let outcome = deal
        .assumptions()
        .map_err(|e| BlockError::Validation(e.to_string()))
        .and_then(|assumptions| {
            engine
                .underwrite(&assumptions)
                .map_err(BlockError::Underwriting)
        });

    DealResult {
        deal_id: deal.deal_id,
        property_name: deal.property_name.clone(),
        outcome,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading deals from {}...", args.input.display());

    let mut deals = load_deals(&args.input)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    println!("Loaded {} deals in {:?}", deals.len(), start.elapsed());

    if let Some(ref status_arg) = args.status {
        let status = DealStatus::parse(status_arg)
            .with_context(|| format!("unknown status filter '{}'", status_arg))?;
        deals.retain(|d| d.status == status);
        log::info!("{} deals remain after status filter '{}'", deals.len(), status.as_str());
    }

    let config = UnderwritingConfig {
        noi_growth_rate: args.noi_growth,
        sale_costs_pct: args.sale_costs_pct,
        ..UnderwritingConfig::default()
    };
    let engine = UnderwritingEngine::new(config);

    println!("Underwriting {} deals...", deals.len());
    let run_start = Instant::now();

    // Each deal prices independently; fan out across cores
    let results: Vec<DealResult> = deals
        .par_iter()
        .map(|deal| underwrite_deal(&engine, deal))
        .collect();

    println!("Underwriting complete in {:?}", run_start.elapsed());

    // Write per-deal output
    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    writeln!(
        file,
        "DealID,PropertyName,TotalProjectCost,LoanAmount,EquityRequired,AnnualDebtService,NOI,SalePrice,SaleProceeds,IRRPct,IRRStatus,EquityMultiple,YieldOnCost,DSCRYear1,Error"
    )?;

    let mut priced = 0usize;
    let mut failed = 0usize;
    let mut converged_irrs: Vec<f64> = Vec::new();

    for result in &results {
        match &result.outcome {
            Ok(metrics) => {
                priced += 1;
                let irr_status = if metrics.irr.is_converged() {
                    "converged"
                } else if metrics.irr.rate().is_some() {
                    "non_converged"
                } else {
                    "undefined"
                };
                if metrics.irr.is_converged() {
                    converged_irrs.push(metrics.irr.percent().unwrap_or(0.0));
                }

                writeln!(
                    file,
                    "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{},{},{:.4},{:.4},{},",
                    result.deal_id,
                    result.property_name,
                    metrics.total_project_cost,
                    metrics.loan_amount,
                    metrics.equity_required,
                    metrics.annual_debt_service,
                    metrics.net_operating_income,
                    metrics.sale_price,
                    metrics.sale_proceeds,
                    metrics.irr.percent().map_or(String::new(), |p| format!("{:.4}", p)),
                    irr_status,
                    metrics.total_return,
                    metrics.yield_on_cost,
                    metrics.dscr_year1.map_or(String::new(), |d| format!("{:.4}", d)),
                )?;
            }
            Err(err) => {
                failed += 1;
                log::warn!("deal {} ({}) failed: {}", result.deal_id, result.property_name, err);
                writeln!(
                    file,
                    "{},{},,,,,,,,,,,,,{}",
                    result.deal_id, result.property_name, err
                )?;
            }
        }
    }

    println!("Output written to {}", args.output.display());

    println!("\nPipeline Summary:");
    println!("  Deals priced: {}", priced);
    println!("  Deals failed: {}", failed);
    if !converged_irrs.is_empty() {
        let mean = converged_irrs.iter().sum::<f64>() / converged_irrs.len() as f64;
        let best = converged_irrs.iter().cloned().fold(f64::MIN, f64::max);
        let worst = converged_irrs.iter().cloned().fold(f64::MAX, f64::min);
        println!("  Converged IRRs: {} (mean {:.2}%, best {:.2}%, worst {:.2}%)",
            converged_irrs.len(), mean, best, worst);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
