//! Claim run: the mutable, claim-scoped aggregate for one pipeline execution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::claim::ClaimFacts;
use crate::domain::error::Result;
use crate::domain::verdict::Verdict;

/// Progress marker for one claim execution.
///
/// Strictly linear: `Pending -> VerdictsGathered -> Decided`. No stage is
/// revisited and `Decided` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Pending,
    VerdictsGathered,
    Decided,
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkflowStage::Pending => "pending",
            WorkflowStage::VerdictsGathered => "verdicts_gathered",
            WorkflowStage::Decided => "decided",
        };
        write!(f, "{s}")
    }
}

/// State owned by exactly one pipeline execution of one claim.
///
/// The verdict sequence is append-only and its order is significant:
/// it follows the fixed specialist roster order regardless of execution
/// concurrency, so aggregation and audit trails are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRun {
    pub run_id: Uuid,
    /// SHA-256 hex digest of the serialized claim facts, for audit logs.
    pub facts_digest: String,
    pub claim_facts: ClaimFacts,
    pub verdict_sequence: Vec<Verdict>,
    pub final_decision: Option<Verdict>,
    pub processing_complete: bool,
    pub stage: WorkflowStage,
    pub duration_ms: u64,
}

impl ClaimRun {
    /// Start a run for validated claim facts.
    pub fn new(claim_facts: ClaimFacts) -> Result<Self> {
        use sha2::Digest as _;
        let bytes = serde_json::to_vec(&claim_facts)?;
        let facts_digest = hex::encode(sha2::Sha256::digest(&bytes));
        Ok(ClaimRun {
            run_id: Uuid::new_v4(),
            facts_digest,
            claim_facts,
            verdict_sequence: Vec::new(),
            final_decision: None,
            processing_complete: false,
            stage: WorkflowStage::Pending,
            duration_ms: 0,
        })
    }

    /// Record the complete specialist verdict sequence, in roster order.
    pub fn record_verdicts(&mut self, verdicts: Vec<Verdict>) {
        self.verdict_sequence = verdicts;
        self.stage = WorkflowStage::VerdictsGathered;
    }

    /// Record the final decision and mark the run terminal.
    pub fn record_decision(&mut self, decision: Verdict) {
        self.final_decision = Some(decision);
        self.processing_complete = true;
        self.stage = WorkflowStage::Decided;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::claim::test_fixtures::sample_claim;
    use crate::domain::verdict::VerdictStatus;

    #[test]
    fn test_new_run_is_pending_and_incomplete() {
        let run = ClaimRun::new(sample_claim()).unwrap();
        assert_eq!(run.stage, WorkflowStage::Pending);
        assert!(!run.processing_complete);
        assert!(run.verdict_sequence.is_empty());
        assert!(run.final_decision.is_none());
    }

    #[test]
    fn test_facts_digest_is_stable_for_identical_facts() {
        let run_a = ClaimRun::new(sample_claim()).unwrap();
        let run_b = ClaimRun::new(sample_claim()).unwrap();
        assert_eq!(run_a.facts_digest, run_b.facts_digest);
        assert_ne!(run_a.run_id, run_b.run_id);
    }

    #[test]
    fn test_stage_advances_through_both_transitions() {
        let mut run = ClaimRun::new(sample_claim()).unwrap();

        run.record_verdicts(vec![Verdict {
            agent: "PolicyValidator".to_string(),
            status: VerdictStatus::Approved,
            reason: "policy_active".to_string(),
            explanation: "Policy was in force on the incident date.".to_string(),
        }]);
        assert_eq!(run.stage, WorkflowStage::VerdictsGathered);
        assert!(!run.processing_complete);

        run.record_decision(Verdict {
            agent: "ClaimDecider".to_string(),
            status: VerdictStatus::Approved,
            reason: "all_agents_approved".to_string(),
            explanation: "All agents approved the claim".to_string(),
        });
        assert_eq!(run.stage, WorkflowStage::Decided);
        assert!(run.processing_complete);
        assert!(run.final_decision.is_some());
    }

    #[test]
    fn test_run_serializes_outbound_shape() {
        let run = ClaimRun::new(sample_claim()).unwrap();
        let value = serde_json::to_value(&run).unwrap();
        assert!(value.get("claim_facts").is_some());
        assert!(value.get("verdict_sequence").is_some());
        assert!(value.get("final_decision").is_some());
        assert!(value.get("processing_complete").is_some());
    }
}
