//! Read-only data-access tools exposed to agents.
//!
//! Every tool is a pure projection of the active claim facts: it returns a
//! serialized snapshot and has no side effects. Two tools carry fixed
//! business constants: the total-loss threshold (80% of actual cash value)
//! and the mileage-discrepancy variance (3000 miles).

use serde_json::json;

/// The thirteen tools agents may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ClaimBasicInfo,
    PolicyInformation,
    DriverInformation,
    VehicleInformation,
    CoverageDetails,
    LiabilityInformation,
    RentalInformation,
    CatastropheInformation,
    DocumentationInfo,
    TotalLossThreshold,
    MileageDiscrepancy,
    DaysBetweenDates,
    DaysSincePolicyStart,
}

/// Mileage variance tolerated before an odometer discrepancy is flagged.
pub const MILEAGE_VARIANCE_MILES: i64 = 3000;

impl ToolKind {
    /// Wire name the engine uses to request this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::ClaimBasicInfo => "get_claim_basic_info",
            ToolKind::PolicyInformation => "get_policy_information",
            ToolKind::DriverInformation => "get_driver_information",
            ToolKind::VehicleInformation => "get_vehicle_information",
            ToolKind::CoverageDetails => "get_coverage_details",
            ToolKind::LiabilityInformation => "get_liability_information",
            ToolKind::RentalInformation => "get_rental_information",
            ToolKind::CatastropheInformation => "get_catastrophe_information",
            ToolKind::DocumentationInfo => "get_documentation_info",
            ToolKind::TotalLossThreshold => "check_total_loss_threshold",
            ToolKind::MileageDiscrepancy => "check_mileage_discrepancy",
            ToolKind::DaysBetweenDates => "calculate_days_between_dates",
            ToolKind::DaysSincePolicyStart => "calculate_days_since_policy_start",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::ClaimBasicInfo => {
                "Get basic claim information including ID, dates, state, and damage summary."
            }
            ToolKind::PolicyInformation => {
                "Get policy-related information including dates, limits, and suspension status."
            }
            ToolKind::DriverInformation => {
                "Get driver-related information including license status and policy listing."
            }
            ToolKind::VehicleInformation => "Get vehicle and damage information.",
            ToolKind::CoverageDetails => "Get coverage and endorsement details.",
            ToolKind::LiabilityInformation => "Get liability and fault information.",
            ToolKind::RentalInformation => "Get rental car and loss of use information.",
            ToolKind::CatastropheInformation => "Get catastrophe and environmental information.",
            ToolKind::DocumentationInfo => "Get document-related information.",
            ToolKind::TotalLossThreshold => {
                "Check whether the repair estimate meets the total loss threshold (80% of ACV)."
            }
            ToolKind::MileageDiscrepancy => {
                "Check for mileage discrepancies between telematics and the reported odometer."
            }
            ToolKind::DaysBetweenDates => "Calculate the number of days between two dates.",
            ToolKind::DaysSincePolicyStart => {
                "Calculate the number of days between the policy start date and the incident date."
            }
        }
    }

    /// JSON-schema parameter spec advertised to the engine.
    ///
    /// Only `calculate_days_between_dates` takes arguments; everything else
    /// projects the ambient claim.
    pub fn parameters(self) -> serde_json::Value {
        match self {
            ToolKind::DaysBetweenDates => json!({
                "type": "object",
                "properties": {
                    "start_date": {
                        "type": "string",
                        "description": "Start date in YYYY-MM-DD format"
                    },
                    "end_date": {
                        "type": "string",
                        "description": "End date in YYYY-MM-DD format"
                    }
                },
                "required": ["start_date", "end_date"]
            }),
            _ => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        ALL_TOOLS.iter().copied().find(|t| t.name() == name)
    }

    /// Schema entry for this tool alone.
    pub fn spec(self) -> ToolSpec {
        ToolSpec {
            name: self.name(),
            description: self.description(),
            parameters: self.parameters(),
        }
    }
}

/// Every tool, in declaration order.
pub const ALL_TOOLS: [ToolKind; 13] = [
    ToolKind::ClaimBasicInfo,
    ToolKind::PolicyInformation,
    ToolKind::DriverInformation,
    ToolKind::VehicleInformation,
    ToolKind::CoverageDetails,
    ToolKind::LiabilityInformation,
    ToolKind::RentalInformation,
    ToolKind::CatastropheInformation,
    ToolKind::DocumentationInfo,
    ToolKind::TotalLossThreshold,
    ToolKind::MileageDiscrepancy,
    ToolKind::DaysBetweenDates,
    ToolKind::DaysSincePolicyStart,
];

/// One entry in the tool schema handed to the reasoning engine.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

/// Errors raised while executing a tool call requested by the engine.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("tool {tool} is not granted to this agent")]
    NotGranted { tool: String },

    #[error("invalid arguments for tool {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tool_names_are_unique() {
        let mut names: Vec<&str> = ALL_TOOLS.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_TOOLS.len());
    }

    #[test]
    fn test_from_name_round_trips() {
        for tool in ALL_TOOLS {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("get_weather"), None);
    }

    #[test]
    fn test_days_between_dates_declares_parameters() {
        let params = ToolKind::DaysBetweenDates.parameters();
        let required = params["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
    }

    #[test]
    fn test_projection_tools_take_no_parameters() {
        let params = ToolKind::PolicyInformation.parameters();
        assert!(params["properties"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_spec_carries_name_and_description() {
        let spec = ToolKind::TotalLossThreshold.spec();
        assert_eq!(spec.name, "check_total_loss_threshold");
        assert!(spec.description.contains("80%"));
    }
}
