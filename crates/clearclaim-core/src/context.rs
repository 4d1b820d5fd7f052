//! Claim context: the per-run data surface tool calls read from.
//!
//! Each pipeline execution owns exactly one `ClaimContext`, so concurrent
//! claim runs can never observe each other's facts. The facts are immutable
//! for the life of the run; no locking is needed.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::claim::ClaimFacts;
use crate::engine::ToolExecutor;
use crate::tools::{ToolError, ToolKind, MILEAGE_VARIANCE_MILES};

/// Read-only tool surface over one claim's facts.
#[derive(Debug, Clone)]
pub struct ClaimContext {
    facts: Arc<ClaimFacts>,
}

impl ClaimContext {
    pub fn new(facts: Arc<ClaimFacts>) -> Self {
        ClaimContext { facts }
    }

    pub fn facts(&self) -> &ClaimFacts {
        &self.facts
    }

    fn opt_date(date: Option<NaiveDate>) -> serde_json::Value {
        match date {
            Some(d) => json!(d.to_string()),
            None => serde_json::Value::Null,
        }
    }

    /// Render one tool's snapshot of the claim facts.
    fn project(&self, tool: ToolKind, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let f = &self.facts;
        let value = match tool {
            ToolKind::ClaimBasicInfo => json!({
                "claim_id": f.claim_id,
                "incident_date": f.incident_date.to_string(),
                "report_date": f.report_date.to_string(),
                "state": f.state,
                "damage_type": f.damage_type,
                "damage_description": f.damage_description,
            }),
            ToolKind::PolicyInformation => json!({
                "policy_start_date": f.policy_start_date.to_string(),
                "policy_end_date": f.policy_end_date.to_string(),
                "coverage_suspension_start": Self::opt_date(f.coverage_suspension_start),
                "coverage_suspension_end": Self::opt_date(f.coverage_suspension_end),
                "cancellation_reason": f.cancellation_reason,
                "per_claim_limit": f.per_claim_limit,
                "annual_aggregate_limit": f.annual_aggregate_limit,
                "remaining_aggregate_limit": f.remaining_aggregate_limit,
            }),
            ToolKind::DriverInformation => json!({
                "driver_name": f.driver_name,
                "driver_license_status": f.driver_license_status,
                "driver_listed_on_policy": f.driver_listed_on_policy,
                "driver_excluded": f.driver_excluded,
                "driver_under_influence": f.driver_under_influence,
                "driver_use_type": f.driver_use_type,
            }),
            ToolKind::VehicleInformation => json!({
                "vin": f.vin,
                "odometer_at_loss": f.odometer_at_loss,
                "telematics_odometer": f.telematics_odometer,
                "repair_estimate": f.repair_estimate,
                "actual_cash_value": f.actual_cash_value,
                "aftermarket_mods": f.aftermarket_mods,
                "recall_active": f.recall_active,
            }),
            ToolKind::CoverageDetails => json!({
                "endorsement_rental_days_allowed": f.endorsement_rental_days_allowed,
                "endorsement_rental_daily_cap": f.endorsement_rental_daily_cap,
                "endorsement_um_uim": f.endorsement_um_uim,
                "endorsement_diminished_value": f.endorsement_diminished_value,
                "endorsement_rideshare_use": f.endorsement_rideshare_use,
            }),
            ToolKind::LiabilityInformation => json!({
                "at_fault_party": f.at_fault_party,
                "insured_liability_percent": f.insured_liability_percent,
                "third_party_insurer": f.third_party_insurer,
            }),
            ToolKind::RentalInformation => json!({
                "rental_days_claimed": f.rental_days_claimed,
                "loss_of_use_daily_rate": f.loss_of_use_daily_rate,
                "endorsement_rental_days_allowed": f.endorsement_rental_days_allowed,
                "endorsement_rental_daily_cap": f.endorsement_rental_daily_cap,
            }),
            ToolKind::CatastropheInformation => json!({
                "loss_location_flood_zone": f.loss_location_flood_zone,
                "cat_event_code": f.cat_event_code,
                "damage_type": f.damage_type,
            }),
            ToolKind::DocumentationInfo => json!({
                "police_report_attached": f.police_report_attached,
                "state": f.state,
                "injuries_reported": f.injuries_reported,
                "primary_med_provider": f.primary_med_provider,
            }),
            ToolKind::TotalLossThreshold => {
                let threshold = f.total_loss_threshold();
                json!({
                    "repair_estimate": f.repair_estimate,
                    "actual_cash_value": f.actual_cash_value,
                    "total_loss_threshold": threshold,
                    "is_total_loss": f.repair_estimate as f64 >= threshold,
                })
            }
            ToolKind::MileageDiscrepancy => {
                let discrepancy = f.odometer_at_loss - f.telematics_odometer;
                json!({
                    "odometer_at_loss": f.odometer_at_loss,
                    "telematics_odometer": f.telematics_odometer,
                    "discrepancy": discrepancy,
                    "allowed_variance": MILEAGE_VARIANCE_MILES,
                    "is_suspicious": discrepancy > MILEAGE_VARIANCE_MILES,
                })
            }
            ToolKind::DaysBetweenDates => {
                let start = Self::parse_date_arg(tool, arguments, "start_date")?;
                let end = Self::parse_date_arg(tool, arguments, "end_date")?;
                json!({
                    "start_date": start.to_string(),
                    "end_date": end.to_string(),
                    "days_between": (end - start).num_days(),
                })
            }
            ToolKind::DaysSincePolicyStart => json!({
                "policy_start_date": f.policy_start_date.to_string(),
                "incident_date": f.incident_date.to_string(),
                "days_since_policy_start": (f.incident_date - f.policy_start_date).num_days(),
            }),
        };

        serde_json::to_string_pretty(&value).map_err(|e| ToolError::InvalidArguments {
            tool: tool.name().to_string(),
            detail: e.to_string(),
        })
    }

    fn parse_date_arg(
        tool: ToolKind,
        arguments: &serde_json::Value,
        key: &str,
    ) -> Result<NaiveDate, ToolError> {
        let raw = arguments
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: tool.name().to_string(),
                detail: format!("missing string argument {key}"),
            })?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ToolError::InvalidArguments {
            tool: tool.name().to_string(),
            detail: format!("{key} is not a YYYY-MM-DD date: {e}"),
        })
    }
}

impl ToolExecutor for ClaimContext {
    fn execute(&self, name: &str, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let tool = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;
        self.project(tool, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::claim::test_fixtures::sample_claim;

    fn context() -> ClaimContext {
        ClaimContext::new(Arc::new(sample_claim()))
    }

    #[test]
    fn test_policy_snapshot_carries_limits() {
        let out = context()
            .execute("get_policy_information", &json!({}))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["per_claim_limit"], 50_000);
        assert_eq!(value["coverage_suspension_start"], serde_json::Value::Null);
    }

    #[test]
    fn test_total_loss_threshold_uses_80_percent_of_acv() {
        let out = context()
            .execute("check_total_loss_threshold", &json!({}))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_loss_threshold"], 21_500.0 * 0.8);
        assert_eq!(value["is_total_loss"], false);
    }

    #[test]
    fn test_mileage_discrepancy_flags_beyond_variance() {
        let mut claim = sample_claim();
        claim.odometer_at_loss = claim.telematics_odometer + MILEAGE_VARIANCE_MILES + 1;
        let ctx = ClaimContext::new(Arc::new(claim));
        let out = ctx.execute("check_mileage_discrepancy", &json!({})).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["is_suspicious"], true);
    }

    #[test]
    fn test_days_between_dates_parses_arguments() {
        let out = context()
            .execute(
                "calculate_days_between_dates",
                &json!({"start_date": "2024-03-01", "end_date": "2024-03-15"}),
            )
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["days_between"], 14);
    }

    #[test]
    fn test_days_between_dates_rejects_bad_argument() {
        let err = context()
            .execute(
                "calculate_days_between_dates",
                &json!({"start_date": "March 1st", "end_date": "2024-03-15"}),
            )
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let err = context().execute("get_weather", &json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { .. }));
    }

    #[test]
    fn test_contexts_are_isolated_per_run() {
        let mut other = sample_claim();
        other.claim_id = "CLM-2024-0099".to_string();

        let ctx_a = context();
        let ctx_b = ClaimContext::new(Arc::new(other));

        let a = ctx_a.execute("get_claim_basic_info", &json!({})).unwrap();
        let b = ctx_b.execute("get_claim_basic_info", &json!({})).unwrap();
        assert!(a.contains("CLM-2024-0042"));
        assert!(b.contains("CLM-2024-0099"));
    }
}
