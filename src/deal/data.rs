//! Deal records matching the acquisition-pipeline format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assumptions::{AssumptionsInput, DealAssumptions, ValidationError};

/// Pipeline status of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Sourced but not yet pursued
    Potential,
    /// Under contract or in due diligence
    Ongoing,
    /// Closed
    Completed,
    /// Passed on
    Rejected,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Potential => "potential",
            DealStatus::Ongoing => "ongoing",
            DealStatus::Completed => "completed",
            DealStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "potential" => Some(DealStatus::Potential),
            "ongoing" => Some(DealStatus::Ongoing),
            "completed" => Some(DealStatus::Completed),
            "rejected" => Some(DealStatus::Rejected),
            _ => None,
        }
    }
}

impl Default for DealStatus {
    fn default() -> Self {
        DealStatus::Potential
    }
}

/// A single deal record from the acquisition pipeline
///
/// Carries the property identity alongside the raw financial fields; the
/// engine only ever sees the validated assumption set produced by
/// [`Deal::assumptions`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    /// Unique deal identifier
    pub deal_id: u32,

    pub property_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    /// Construction year of the asset
    pub year_built: u32,

    #[serde(default)]
    pub status: DealStatus,

    // Financial inputs (see AssumptionsInput for field semantics)
    pub total_units: u32,
    pub purchase_price: f64,
    pub avg_monthly_rent: f64,
    pub construction_cost_pct: f64,
    pub closing_costs_pct: f64,
    pub operating_expense_ratio: f64,
    pub vacancy_rate: f64,
    pub bad_debt_rate: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub ltv: f64,
    pub exit_cap_rate: f64,
    pub holding_period_years: u32,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deal {
    /// Raw assumption record for the validation boundary
    pub fn to_input(&self) -> AssumptionsInput {
        AssumptionsInput {
            total_units: self.total_units,
            purchase_price: self.purchase_price,
            avg_monthly_rent: self.avg_monthly_rent,
            construction_cost_pct: self.construction_cost_pct,
            closing_costs_pct: self.closing_costs_pct,
            operating_expense_ratio: self.operating_expense_ratio,
            vacancy_rate: self.vacancy_rate,
            bad_debt_rate: self.bad_debt_rate,
            interest_rate: self.interest_rate,
            loan_term_years: self.loan_term_years,
            ltv: self.ltv,
            exit_cap_rate: self.exit_cap_rate,
            holding_period_years: self.holding_period_years,
        }
    }

    /// Validated assumptions, ready for the engine
    pub fn assumptions(&self) -> Result<DealAssumptions, ValidationError> {
        self.to_input().validate()
    }

    /// Price per unit, the pipeline's first-glance screen
    pub fn price_per_unit(&self) -> f64 {
        if self.total_units == 0 {
            return 0.0;
        }
        self.purchase_price / self.total_units as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deal() -> Deal {
        Deal {
            deal_id: 1,
            property_name: "Bedrock Gardens".to_string(),
            address: "123 Main Street".to_string(),
            city: "Sacramento".to_string(),
            state: "CA".to_string(),
            zip_code: "95814".to_string(),
            year_built: 1985,
            status: DealStatus::Potential,
            total_units: 200,
            purchase_price: 4_100_000.0,
            avg_monthly_rent: 1_540.0,
            construction_cost_pct: 0.10,
            closing_costs_pct: 0.03,
            operating_expense_ratio: 0.40,
            vacancy_rate: 0.05,
            bad_debt_rate: 0.0,
            interest_rate: 0.065,
            loan_term_years: 30,
            ltv: 70.0,
            exit_cap_rate: 0.06,
            holding_period_years: 10,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            DealStatus::Potential,
            DealStatus::Ongoing,
            DealStatus::Completed,
            DealStatus::Rejected,
        ] {
            assert_eq!(DealStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DealStatus::parse("closed"), None);
    }

    #[test]
    fn test_deal_validates_to_assumptions() {
        let deal = sample_deal();
        let assumptions = deal.assumptions().expect("sample deal is valid");

        assert_eq!(assumptions.total_units, 200);
        assert_eq!(assumptions.ltv, 70.0);
    }

    #[test]
    fn test_invalid_deal_surfaces_validation_error() {
        let mut deal = sample_deal();
        deal.vacancy_rate = 2.0;

        assert!(deal.assumptions().is_err());
    }

    #[test]
    fn test_json_round_trip_with_timestamps() {
        let mut deal = sample_deal();
        deal.created_at = Some("2025-03-01T00:00:00Z".parse().unwrap());

        let json = serde_json::to_string(&deal).unwrap();
        let parsed: Deal = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.created_at, deal.created_at);
        assert_eq!(parsed.updated_at, None);
        assert_eq!(parsed.status, DealStatus::Potential);
    }

    #[test]
    fn test_price_per_unit() {
        let deal = sample_deal();
        assert_eq!(deal.price_per_unit(), 20_500.0);

        let mut empty = sample_deal();
        empty.total_units = 0;
        assert_eq!(empty.price_per_unit(), 0.0);
    }
}
