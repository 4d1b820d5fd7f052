//! Workflow state machine: gather verdicts, then decide.
//!
//! One instance serves many claims, but all run state is claim-scoped:
//! each `run` call owns its `ClaimRun` and `ClaimContext` exclusively, so
//! independent claims may be processed concurrently without any shared
//! mutable state. Given valid input the workflow never fails — it always
//! terminates with a final verdict.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use crate::aggregate;
use crate::agents::roster::Roster;
use crate::config::Settings;
use crate::context::ClaimContext;
use crate::domain::claim::ClaimFacts;
use crate::domain::error::Result;
use crate::domain::run::ClaimRun;
use crate::engine::http::{HttpChatEngine, HttpEngineConfig};
use crate::engine::{EngineError, ReasoningEngine};
use crate::pipeline;

/// The two-stage claim processing workflow.
pub struct ClaimWorkflow {
    engine: Arc<dyn ReasoningEngine>,
    roster: Roster,
    settings: Settings,
}

impl ClaimWorkflow {
    pub fn new(engine: Arc<dyn ReasoningEngine>, roster: Roster, settings: Settings) -> Self {
        ClaimWorkflow {
            engine,
            roster,
            settings,
        }
    }

    /// Build a workflow against the configured provider's HTTP engine,
    /// reading the credential from the provider's environment variable.
    pub fn with_http_engine(settings: Settings) -> std::result::Result<Self, EngineError> {
        let config = HttpEngineConfig::from_env(settings.provider)?
            .with_model(settings.resolved_model())
            .with_temperature(settings.temperature)
            .with_max_tokens(settings.max_tokens);

        let roster = Roster::load(settings.prompt_dir.as_deref());
        Ok(ClaimWorkflow::new(
            Arc::new(HttpChatEngine::new(config)?),
            roster,
            settings,
        ))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Drive one claim through both stages and return the terminal run.
    ///
    /// Validation failures surface as [`crate::domain::ClaimError`] before
    /// the pipeline starts; once past validation the run always completes
    /// with `processing_complete = true` and exactly one final verdict.
    #[instrument(skip(self, facts), fields(claim_id = %facts.claim_id))]
    pub async fn run(&self, facts: ClaimFacts) -> Result<ClaimRun> {
        facts.validate()?;

        let started = Instant::now();
        let mut run = ClaimRun::new(facts)?;
        info!(
            run_id = %run.run_id,
            facts_digest = %run.facts_digest,
            mode = ?self.settings.execution,
            "claim run started"
        );

        // Stage 1: Pending -> VerdictsGathered.
        let context = Arc::new(ClaimContext::new(Arc::new(run.claim_facts.clone())));
        let verdicts = pipeline::gather_verdicts(
            Arc::clone(&self.engine),
            &self.roster.specialists,
            context,
            &self.settings.execution,
            self.settings.request_timeout,
        )
        .await;
        run.record_verdicts(verdicts);

        // Stage 2: VerdictsGathered -> Decided.
        let decision = aggregate::decide(
            self.engine.as_ref(),
            &self.roster.decider,
            &run.verdict_sequence,
            self.settings.request_timeout,
            !self.settings.skip_reasoned_decision,
        )
        .await;
        info!(
            run_id = %run.run_id,
            status = %decision.status,
            reason = %decision.reason,
            "claim run decided"
        );
        run.record_decision(decision);
        run.duration_ms = started.elapsed().as_millis() as u64;

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::claim::test_fixtures::sample_claim;
    use crate::domain::error::ClaimError;
    use crate::engine::ToolExecutor;
    use crate::tools::ToolSpec;
    use async_trait::async_trait;

    struct UnreachableEngine;

    #[async_trait]
    impl ReasoningEngine for UnreachableEngine {
        async fn invoke(
            &self,
            _instructions: &str,
            _task: &str,
            _tools: &[ToolSpec],
            _executor: &dyn ToolExecutor,
        ) -> std::result::Result<String, EngineError> {
            panic!("engine must not be reached for invalid input");
        }
    }

    #[tokio::test]
    async fn test_invalid_claim_is_rejected_before_any_invocation() {
        let workflow = ClaimWorkflow::new(
            Arc::new(UnreachableEngine),
            Roster::load(None),
            Settings::default(),
        );

        let mut claim = sample_claim();
        claim.claim_id = String::new();

        let err = workflow.run(claim).await.unwrap_err();
        assert!(matches!(err, ClaimError::InvalidClaim(_)));
    }
}
