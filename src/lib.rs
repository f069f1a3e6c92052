//! Underwriting System - multifamily acquisition underwriting engine
//!
//! This library provides:
//! - A validated assumption boundary for untrusted deal inputs
//! - Deterministic derivation of underwriting metrics (project cost, debt
//!   sizing, annual pro forma, exit reversion)
//! - A Newton-Raphson levered IRR solver with explicit failure outcomes
//! - Sensitivity and batch scenario running over deal pipelines

pub mod deal;
pub mod assumptions;
pub mod underwriting;
pub mod scenario;

// Re-export commonly used types
pub use deal::{Deal, DealStatus};
pub use assumptions::{AssumptionsInput, DealAssumptions, ValidationError};
pub use underwriting::{
    DerivedMetrics, IrrOutcome, UnderwritingConfig, UnderwritingEngine, UnderwritingError,
};
pub use scenario::ScenarioRunner;
