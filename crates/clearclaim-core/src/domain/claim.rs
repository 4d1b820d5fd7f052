//! Claim facts: the immutable input record for one pipeline run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ClaimError, Result};

/// One auto insurance claim, as submitted by the caller.
///
/// Created once per request, validated before pipeline entry, and read-only
/// for the duration of the run. Data-access tools project subsets of these
/// fields; agents never see the record directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimFacts {
    pub claim_id: String,
    pub incident_date: NaiveDate,
    pub report_date: NaiveDate,
    pub state: String,

    // Policy window and limits
    pub policy_start_date: NaiveDate,
    pub policy_end_date: NaiveDate,
    #[serde(default)]
    pub coverage_suspension_start: Option<NaiveDate>,
    #[serde(default)]
    pub coverage_suspension_end: Option<NaiveDate>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    pub per_claim_limit: i64,
    pub annual_aggregate_limit: i64,
    pub remaining_aggregate_limit: i64,

    // Endorsements
    pub endorsement_rental_days_allowed: u32,
    pub endorsement_rental_daily_cap: i64,
    pub endorsement_um_uim: bool,
    pub endorsement_diminished_value: bool,
    pub endorsement_rideshare_use: bool,

    // Driver
    pub driver_name: String,
    pub driver_license_status: String,
    pub driver_listed_on_policy: bool,
    pub driver_excluded: bool,
    pub driver_under_influence: bool,
    pub driver_use_type: String,

    // Vehicle and damage
    pub vin: String,
    pub odometer_at_loss: i64,
    pub telematics_odometer: i64,
    pub damage_description: String,
    pub damage_type: String,
    pub repair_estimate: i64,
    pub actual_cash_value: i64,
    pub aftermarket_mods: bool,
    pub recall_active: bool,

    // Documentation and environment
    pub police_report_attached: bool,
    pub loss_location_flood_zone: String,
    #[serde(default)]
    pub cat_event_code: Option<String>,

    // Rental / loss of use
    pub rental_days_claimed: u32,
    pub loss_of_use_daily_rate: i64,

    // Liability
    pub at_fault_party: String,
    pub insured_liability_percent: u8,
    #[serde(default)]
    pub third_party_insurer: Option<String>,

    // Injuries
    pub injuries_reported: bool,
    #[serde(default)]
    pub primary_med_provider: Option<String>,

    // Dataset passthrough fields; ignored by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_reason: Option<String>,
}

impl ClaimFacts {
    /// Validate the submission before it enters the pipeline.
    ///
    /// Failures here surface as [`ClaimError::InvalidClaim`] to the caller,
    /// never as an ESCALATE verdict.
    pub fn validate(&self) -> Result<()> {
        if self.claim_id.trim().is_empty() {
            return Err(ClaimError::InvalidClaim("claim_id must not be empty".into()));
        }
        if self.vin.trim().is_empty() {
            return Err(ClaimError::InvalidClaim("vin must not be empty".into()));
        }
        if self.report_date < self.incident_date {
            return Err(ClaimError::InvalidClaim(format!(
                "report_date {} precedes incident_date {}",
                self.report_date, self.incident_date
            )));
        }
        if self.policy_end_date < self.policy_start_date {
            return Err(ClaimError::InvalidClaim(format!(
                "policy_end_date {} precedes policy_start_date {}",
                self.policy_end_date, self.policy_start_date
            )));
        }
        if self.insured_liability_percent > 100 {
            return Err(ClaimError::InvalidClaim(format!(
                "insured_liability_percent {} exceeds 100",
                self.insured_liability_percent
            )));
        }
        if self.actual_cash_value <= 0 {
            return Err(ClaimError::InvalidClaim(
                "actual_cash_value must be positive".into(),
            ));
        }
        if self.repair_estimate < 0 {
            return Err(ClaimError::InvalidClaim(
                "repair_estimate must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Repair estimate threshold above which the vehicle is a total loss
    /// (80% of actual cash value).
    pub fn total_loss_threshold(&self) -> f64 {
        self.actual_cash_value as f64 * 0.8
    }
}

#[cfg(test)]
pub mod test_fixtures {
    use super::*;

    /// A claim that passes validation; tests tweak individual fields.
    pub fn sample_claim() -> ClaimFacts {
        ClaimFacts {
            claim_id: "CLM-2024-0042".to_string(),
            incident_date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            report_date: NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(),
            state: "TX".to_string(),
            policy_start_date: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            policy_end_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            coverage_suspension_start: None,
            coverage_suspension_end: None,
            cancellation_reason: None,
            per_claim_limit: 50_000,
            annual_aggregate_limit: 100_000,
            remaining_aggregate_limit: 80_000,
            endorsement_rental_days_allowed: 30,
            endorsement_rental_daily_cap: 40,
            endorsement_um_uim: true,
            endorsement_diminished_value: false,
            endorsement_rideshare_use: false,
            driver_name: "Jordan Avery".to_string(),
            driver_license_status: "valid".to_string(),
            driver_listed_on_policy: true,
            driver_excluded: false,
            driver_under_influence: false,
            driver_use_type: "personal".to_string(),
            vin: "1HGCM82633A004352".to_string(),
            odometer_at_loss: 48_200,
            telematics_odometer: 48_050,
            damage_description: "Front-end collision with guardrail".to_string(),
            damage_type: "collision".to_string(),
            repair_estimate: 9_800,
            actual_cash_value: 21_500,
            aftermarket_mods: false,
            recall_active: false,
            police_report_attached: true,
            loss_location_flood_zone: "none".to_string(),
            cat_event_code: None,
            rental_days_claimed: 12,
            loss_of_use_daily_rate: 35,
            at_fault_party: "insured".to_string(),
            insured_liability_percent: 100,
            third_party_insurer: None,
            injuries_reported: false,
            primary_med_provider: None,
            expected_status: None,
            expected_reason: None,
        }
    }
}
