//! Decision aggregation: N specialist verdicts to one final verdict.
//!
//! The primary path asks the ClaimDecider agent to apply the precedence
//! hierarchy, with the full verdict sequence serialized straight into its
//! task message. The deterministic fallback applies the hierarchy itself
//! (REJECTED > ESCALATE > PARTIAL > APPROVED, scanned in sequence order)
//! and is authoritative whenever the reasoned path fails to produce a
//! valid verdict.

use std::time::Duration;

use tracing::{info, warn};

use crate::agents::roster::{AgentContract, AgentKind};
use crate::agents::runner::{EXECUTION_ERROR_REASON, PARSING_ERROR_REASON, TIMEOUT_REASON};
use crate::decode::extract_verdict;
use crate::domain::verdict::{Verdict, VerdictStatus};
use crate::engine::ReasoningEngine;

/// Apply the precedence hierarchy deterministically.
///
/// First match wins, scanned in verdict-sequence order, so the earliest
/// qualifying agent's reason is carried into the final verdict and its
/// origin is named in the explanation. An empty (or unanimously approved)
/// sequence approves.
pub fn fallback_decision(verdicts: &[Verdict]) -> Verdict {
    let decider = AgentKind::ClaimDecider.name();

    let tiers: [(VerdictStatus, &str); 3] = [
        (VerdictStatus::Rejected, "Claim rejected by"),
        (VerdictStatus::Escalate, "Claim escalated by"),
        (VerdictStatus::Partial, "Partial approval due to"),
    ];

    for (status, prefix) in tiers {
        if let Some(v) = verdicts.iter().find(|v| v.status == status) {
            return Verdict {
                agent: decider.to_string(),
                status,
                reason: v.reason.clone(),
                explanation: format!("{prefix} {}: {}", v.agent, v.explanation),
            };
        }
    }

    Verdict {
        agent: decider.to_string(),
        status: VerdictStatus::Approved,
        reason: "all_agents_approved".to_string(),
        explanation: "All agents approved the claim".to_string(),
    }
}

fn decider_task(verdicts: &[Verdict]) -> Result<String, serde_json::Error> {
    let serialized = serde_json::to_string_pretty(verdicts)?;
    Ok(format!(
        "Analyze all agent responses and make the final claim decision.\n\n\
         Agent responses:\n{serialized}\n\n\
         Apply the decision hierarchy rules (REJECTED > ESCALATE > PARTIAL > APPROVED)\n\
         to determine the final outcome.\n\n\
         Return your decision in this EXACT JSON format:\n\
         {{\n\
           \"agent\": \"ClaimDecider\",\n\
           \"status\": \"APPROVED | REJECTED | PARTIAL | ESCALATE\",\n\
           \"reason\": \"concise_slug_snake_case\",\n\
           \"explanation\": \"concise summary mentioning contributing agents and their reasons\"\n\
         }}"
    ))
}

/// Reduce the verdict sequence to the final decision.
///
/// With `use_engine = false` the reasoning call is skipped entirely and
/// the deterministic hierarchy decides. Any failure on the reasoned path
/// (invocation fault, timeout, unparseable output) also falls back — the
/// aggregator, like the agent runner, never raises.
pub async fn decide(
    engine: &dyn ReasoningEngine,
    decider: &AgentContract,
    verdicts: &[Verdict],
    request_timeout: Duration,
    use_engine: bool,
) -> Verdict {
    if !use_engine {
        return fallback_decision(verdicts);
    }

    let task = match decider_task(verdicts) {
        Ok(task) => task,
        Err(e) => {
            warn!(error = %e, "could not serialize verdicts for the decider");
            return fallback_decision(verdicts);
        }
    };

    let tools = decider.tool_specs();
    let noop = NoTools;
    let invocation = engine.invoke(&decider.instructions, &task, &tools, &noop);
    let text = match tokio::time::timeout(request_timeout, invocation).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(error = %e, reason = EXECUTION_ERROR_REASON, "decider invocation failed, using deterministic hierarchy");
            return fallback_decision(verdicts);
        }
        Err(_) => {
            warn!(reason = TIMEOUT_REASON, "decider invocation timed out, using deterministic hierarchy");
            return fallback_decision(verdicts);
        }
    };

    match extract_verdict(&text) {
        Ok(mut verdict) => {
            // The final verdict is always attributed to the decider.
            verdict.agent = AgentKind::ClaimDecider.name().to_string();
            info!(status = %verdict.status, "reasoned final decision accepted");
            verdict
        }
        Err(e) => {
            warn!(error = %e, reason = PARSING_ERROR_REASON, "decider output unparseable, using deterministic hierarchy");
            fallback_decision(verdicts)
        }
    }
}

/// The decider holds no tool grants; reject any stray call.
struct NoTools;

impl crate::engine::ToolExecutor for NoTools {
    fn execute(
        &self,
        name: &str,
        _arguments: &serde_json::Value,
    ) -> Result<String, crate::tools::ToolError> {
        Err(crate::tools::ToolError::NotGranted {
            tool: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::roster::Roster;
    use crate::engine::{EngineError, ToolExecutor};
    use crate::tools::ToolSpec;
    use async_trait::async_trait;

    fn verdict(agent: &str, status: VerdictStatus, reason: &str) -> Verdict {
        Verdict {
            agent: agent.to_string(),
            status,
            reason: reason.to_string(),
            explanation: format!("{agent} rendered {status}."),
        }
    }

    fn nine_approved() -> Vec<Verdict> {
        AgentKind::SPECIALISTS
            .iter()
            .map(|k| verdict(k.name(), VerdictStatus::Approved, "ok"))
            .collect()
    }

    #[test]
    fn test_unanimous_approval() {
        let decision = fallback_decision(&nine_approved());
        assert_eq!(decision.status, VerdictStatus::Approved);
        assert_eq!(decision.reason, "all_agents_approved");
        assert_eq!(decision.agent, "ClaimDecider");
    }

    #[test]
    fn test_single_rejection_wins() {
        let mut verdicts = nine_approved();
        verdicts[2] = verdict("DriverVerifier", VerdictStatus::Rejected, "driver_excluded");

        let decision = fallback_decision(&verdicts);
        assert_eq!(decision.status, VerdictStatus::Rejected);
        assert_eq!(decision.reason, "driver_excluded");
        assert!(decision.explanation.contains("DriverVerifier"));
    }

    #[test]
    fn test_rejected_outranks_escalate_regardless_of_position() {
        let mut verdicts = nine_approved();
        verdicts[1] = verdict("DocumentValidator", VerdictStatus::Escalate, "missing_docs");
        verdicts[7] = verdict("RentalBenefitChecker", VerdictStatus::Rejected, "no_rental_endorsement");

        let decision = fallback_decision(&verdicts);
        assert_eq!(decision.status, VerdictStatus::Rejected);
        assert!(decision.explanation.contains("RentalBenefitChecker"));
    }

    #[test]
    fn test_escalate_outranks_partial() {
        let mut verdicts = nine_approved();
        verdicts[4] = verdict("CoverageEvaluator", VerdictStatus::Partial, "over_limit");
        verdicts[8] = verdict("FraudDetector", VerdictStatus::Escalate, "mileage_discrepancy");

        let decision = fallback_decision(&verdicts);
        assert_eq!(decision.status, VerdictStatus::Escalate);
        assert_eq!(decision.reason, "mileage_discrepancy");
    }

    #[test]
    fn test_first_qualifying_agent_in_sequence_order_is_carried() {
        let mut verdicts = nine_approved();
        verdicts[3] = verdict("VehicleDamageEvaluator", VerdictStatus::Partial, "total_loss_cap");
        verdicts[7] = verdict("RentalBenefitChecker", VerdictStatus::Partial, "rental_cap");

        let decision = fallback_decision(&verdicts);
        assert_eq!(decision.reason, "total_loss_cap");
        assert!(decision.explanation.contains("VehicleDamageEvaluator"));
    }

    #[test]
    fn test_empty_sequence_approves() {
        let decision = fallback_decision(&[]);
        assert_eq!(decision.status, VerdictStatus::Approved);
        assert_eq!(decision.reason, "all_agents_approved");
    }

    #[test]
    fn test_fallback_is_idempotent() {
        let mut verdicts = nine_approved();
        verdicts[5] = verdict("CatastropheChecker", VerdictStatus::Escalate, "cat_event_active");

        let first = fallback_decision(&verdicts);
        let second = fallback_decision(&verdicts);
        assert_eq!(first, second);
    }

    struct ScriptedDecider(Result<String, ()>);

    #[async_trait]
    impl ReasoningEngine for ScriptedDecider {
        async fn invoke(
            &self,
            _instructions: &str,
            task: &str,
            _tools: &[ToolSpec],
            _executor: &dyn ToolExecutor,
        ) -> Result<String, EngineError> {
            // The verdict sequence must be serialized into the task.
            assert!(task.contains("Agent responses:"));
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(EngineError::EmptyResponse),
            }
        }
    }

    fn decider_contract() -> AgentContract {
        Roster::load(None).decider
    }

    #[tokio::test]
    async fn test_reasoned_decision_is_accepted_and_attributed() {
        let engine = ScriptedDecider(Ok(
            r#"{"agent":"SomethingElse","status":"PARTIAL","reason":"coverage_cap","explanation":"Capped by coverage limits."}"#.to_string(),
        ));
        let decision = decide(
            &engine,
            &decider_contract(),
            &nine_approved(),
            Duration::from_secs(5),
            true,
        )
        .await;
        assert_eq!(decision.status, VerdictStatus::Partial);
        assert_eq!(decision.agent, "ClaimDecider");
    }

    #[tokio::test]
    async fn test_unparseable_decider_output_falls_back() {
        let engine = ScriptedDecider(Ok("I cannot decide.".to_string()));
        let mut verdicts = nine_approved();
        verdicts[0] = verdict("PolicyValidator", VerdictStatus::Rejected, "policy_lapsed");

        let decision = decide(
            &engine,
            &decider_contract(),
            &verdicts,
            Duration::from_secs(5),
            true,
        )
        .await;
        assert_eq!(decision.status, VerdictStatus::Rejected);
        assert_eq!(decision.reason, "policy_lapsed");
    }

    #[tokio::test]
    async fn test_failed_decider_invocation_falls_back() {
        let engine = ScriptedDecider(Err(()));
        let decision = decide(
            &engine,
            &decider_contract(),
            &nine_approved(),
            Duration::from_secs(5),
            true,
        )
        .await;
        assert_eq!(decision.status, VerdictStatus::Approved);
        assert_eq!(decision.reason, "all_agents_approved");
    }

    #[tokio::test]
    async fn test_use_engine_false_skips_the_call() {
        // Engine would panic if invoked; skipping must never touch it.
        struct PanickingEngine;

        #[async_trait]
        impl ReasoningEngine for PanickingEngine {
            async fn invoke(
                &self,
                _instructions: &str,
                _task: &str,
                _tools: &[ToolSpec],
                _executor: &dyn ToolExecutor,
            ) -> Result<String, EngineError> {
                panic!("decider engine must not be invoked");
            }
        }

        let decision = decide(
            &PanickingEngine,
            &decider_contract(),
            &nine_approved(),
            Duration::from_secs(5),
            false,
        )
        .await;
        assert_eq!(decision.status, VerdictStatus::Approved);
    }
}
