//! Agent contracts: identity, tool grants, and instruction templates.
//!
//! The roster is static per-process metadata. It is built once and shared
//! read-only by every claim run; membership and order are fixed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agents::prompts;
use crate::tools::{ToolKind, ToolSpec};

/// The nine specialist evaluators plus the final decider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    PolicyValidator,
    DocumentValidator,
    DriverVerifier,
    VehicleDamageEvaluator,
    CoverageEvaluator,
    CatastropheChecker,
    LiabilityAssessor,
    RentalBenefitChecker,
    FraudDetector,
    ClaimDecider,
}

impl AgentKind {
    /// Fixed specialist order. Verdicts are appended in this order
    /// regardless of execution concurrency.
    pub const SPECIALISTS: [AgentKind; 9] = [
        AgentKind::PolicyValidator,
        AgentKind::DocumentValidator,
        AgentKind::DriverVerifier,
        AgentKind::VehicleDamageEvaluator,
        AgentKind::CoverageEvaluator,
        AgentKind::CatastropheChecker,
        AgentKind::LiabilityAssessor,
        AgentKind::RentalBenefitChecker,
        AgentKind::FraudDetector,
    ];

    /// Wire identity: the `agent` field agents emit in their verdicts.
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::PolicyValidator => "PolicyValidator",
            AgentKind::DocumentValidator => "DocumentValidator",
            AgentKind::DriverVerifier => "DriverVerifier",
            AgentKind::VehicleDamageEvaluator => "VehicleDamageEvaluator",
            AgentKind::CoverageEvaluator => "CoverageEvaluator",
            AgentKind::CatastropheChecker => "CatastropheChecker",
            AgentKind::LiabilityAssessor => "LiabilityAssessor",
            AgentKind::RentalBenefitChecker => "RentalBenefitChecker",
            AgentKind::FraudDetector => "FraudDetector",
            AgentKind::ClaimDecider => "ClaimDecider",
        }
    }

    /// snake_case directory name for on-disk instruction templates.
    pub fn slug(self) -> &'static str {
        match self {
            AgentKind::PolicyValidator => "policy_validator",
            AgentKind::DocumentValidator => "document_validator",
            AgentKind::DriverVerifier => "driver_verifier",
            AgentKind::VehicleDamageEvaluator => "vehicle_damage_evaluator",
            AgentKind::CoverageEvaluator => "coverage_evaluator",
            AgentKind::CatastropheChecker => "catastrophe_checker",
            AgentKind::LiabilityAssessor => "liability_assessor",
            AgentKind::RentalBenefitChecker => "rental_benefit_checker",
            AgentKind::FraudDetector => "fraud_detector",
            AgentKind::ClaimDecider => "claim_decider",
        }
    }

    pub fn role_summary(self) -> &'static str {
        match self {
            AgentKind::PolicyValidator => "Validates policy eligibility and timing for the claim",
            AgentKind::DocumentValidator => "Verifies required documentation is present and complete",
            AgentKind::DriverVerifier => "Verifies driver eligibility against the policy",
            AgentKind::VehicleDamageEvaluator => "Evaluates vehicle damage and total-loss status",
            AgentKind::CoverageEvaluator => "Evaluates coverage limits and endorsements",
            AgentKind::CatastropheChecker => "Applies catastrophe-zone rules for the loss location",
            AgentKind::LiabilityAssessor => "Allocates liability for the incident",
            AgentKind::RentalBenefitChecker => "Checks rental and loss-of-use benefit eligibility",
            AgentKind::FraudDetector => "Scans the claim for fraud and anomaly patterns",
            AgentKind::ClaimDecider => "Reduces all specialist verdicts to the final decision",
        }
    }

    /// Read-only tool subset this agent may invoke.
    ///
    /// The decider gets no tools: the verdict sequence is serialized
    /// directly into its task message instead.
    pub fn tool_grants(self) -> &'static [ToolKind] {
        match self {
            AgentKind::PolicyValidator => &[
                ToolKind::ClaimBasicInfo,
                ToolKind::PolicyInformation,
                ToolKind::DaysBetweenDates,
            ],
            AgentKind::DocumentValidator => {
                &[ToolKind::ClaimBasicInfo, ToolKind::DocumentationInfo]
            }
            AgentKind::DriverVerifier => &[ToolKind::DriverInformation, ToolKind::CoverageDetails],
            AgentKind::VehicleDamageEvaluator => &[
                ToolKind::ClaimBasicInfo,
                ToolKind::VehicleInformation,
                ToolKind::TotalLossThreshold,
            ],
            AgentKind::CoverageEvaluator => &[
                ToolKind::ClaimBasicInfo,
                ToolKind::PolicyInformation,
                ToolKind::VehicleInformation,
                ToolKind::CoverageDetails,
                ToolKind::LiabilityInformation,
            ],
            AgentKind::CatastropheChecker => {
                &[ToolKind::ClaimBasicInfo, ToolKind::CatastropheInformation]
            }
            AgentKind::LiabilityAssessor => {
                &[ToolKind::LiabilityInformation, ToolKind::DocumentationInfo]
            }
            AgentKind::RentalBenefitChecker => {
                &[ToolKind::RentalInformation, ToolKind::CoverageDetails]
            }
            AgentKind::FraudDetector => &[
                ToolKind::ClaimBasicInfo,
                ToolKind::PolicyInformation,
                ToolKind::VehicleInformation,
                ToolKind::CatastropheInformation,
                ToolKind::MileageDiscrepancy,
                ToolKind::DaysBetweenDates,
            ],
            AgentKind::ClaimDecider => &[],
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Static per-agent metadata shared by all claim runs.
#[derive(Debug, Clone)]
pub struct AgentContract {
    pub kind: AgentKind,
    pub tools: Vec<ToolKind>,
    pub instructions: String,
}

impl AgentContract {
    /// Tool schema handed to the engine for this agent's invocation.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }
}

/// The full agent roster: nine specialists in fixed order plus the decider.
#[derive(Debug, Clone)]
pub struct Roster {
    pub specialists: Vec<AgentContract>,
    pub decider: AgentContract,
}

impl Roster {
    /// Build the roster, loading instruction templates from `prompt_dir`
    /// when present and falling back to embedded templates otherwise.
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let contract = |kind: AgentKind| AgentContract {
            kind,
            tools: kind.tool_grants().to_vec(),
            instructions: prompts::load_instructions(kind, prompt_dir),
        };

        Roster {
            specialists: AgentKind::SPECIALISTS.iter().copied().map(contract).collect(),
            decider: contract(AgentKind::ClaimDecider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_has_nine_specialists_in_fixed_order() {
        let roster = Roster::load(None);
        assert_eq!(roster.specialists.len(), 9);
        assert_eq!(roster.specialists[0].kind, AgentKind::PolicyValidator);
        assert_eq!(roster.specialists[8].kind, AgentKind::FraudDetector);
        assert_eq!(roster.decider.kind, AgentKind::ClaimDecider);
    }

    #[test]
    fn test_decider_has_no_tool_grants() {
        assert!(AgentKind::ClaimDecider.tool_grants().is_empty());
    }

    #[test]
    fn test_fraud_detector_can_check_mileage() {
        assert!(AgentKind::FraudDetector
            .tool_grants()
            .contains(&ToolKind::MileageDiscrepancy));
    }

    #[test]
    fn test_contract_tool_specs_match_grants() {
        let roster = Roster::load(None);
        let policy = &roster.specialists[0];
        let specs = policy.tool_specs();
        assert_eq!(specs.len(), policy.tools.len());
        assert_eq!(specs[0].name, "get_claim_basic_info");
    }

    #[test]
    fn test_agent_names_are_unique() {
        let mut names: Vec<&str> = AgentKind::SPECIALISTS.iter().map(|k| k.name()).collect();
        names.push(AgentKind::ClaimDecider.name());
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_instructions_are_never_empty() {
        let roster = Roster::load(None);
        for contract in roster.specialists.iter().chain([&roster.decider]) {
            assert!(!contract.instructions.trim().is_empty(), "{}", contract.kind);
        }
    }
}
