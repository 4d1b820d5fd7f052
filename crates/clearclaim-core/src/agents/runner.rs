//! Agent runner: drives one reasoning invocation to one verdict.
//!
//! The runner never raises past its boundary. Every failure mode —
//! transport fault, timeout, tool error, unparseable output — is converted
//! into a degraded-but-valid ESCALATE verdict carrying the underlying
//! error text, so the scheduler can treat every agent uniformly.

use std::time::Duration;

use tracing::{debug, warn};

use crate::agents::roster::AgentContract;
use crate::context::ClaimContext;
use crate::decode::extract_verdict;
use crate::domain::verdict::Verdict;
use crate::engine::ReasoningEngine;

/// Failure-classifying reason slugs for synthesized verdicts.
pub const PARSING_ERROR_REASON: &str = "agent_parsing_error";
pub const EXECUTION_ERROR_REASON: &str = "agent_execution_error";
pub const TIMEOUT_REASON: &str = "agent_timeout";

/// The user-turn directive sent with every specialist invocation.
fn task_message(agent_name: &str) -> String {
    format!(
        "Analyze the claim data using your available tools and make a decision.\n\n\
         You must:\n\
         1. Use the appropriate tools to gather relevant information\n\
         2. Apply your domain-specific rules and logic\n\
         3. Return a final decision in this EXACT JSON format:\n\
         {{\n\
           \"agent\": \"{agent_name}\",\n\
           \"status\": \"APPROVED | REJECTED | PARTIAL | ESCALATE\",\n\
           \"reason\": \"concise_slug_snake_case\",\n\
           \"explanation\": \"1-2 sentence human-readable rationale\"\n\
         }}\n\n\
         Make sure to return only the JSON object, no other text."
    )
}

/// Obtain one verdict from one agent against the active claim context.
///
/// `request_timeout` bounds the whole engine invocation including any tool
/// rounds; elapsing it yields a timeout-classified ESCALATE, not an error.
pub async fn run_agent(
    engine: &dyn ReasoningEngine,
    contract: &AgentContract,
    context: &ClaimContext,
    request_timeout: Duration,
) -> Verdict {
    let agent_name = contract.kind.name();
    let tools = contract.tool_specs();
    let task = task_message(agent_name);

    let invocation = engine.invoke(&contract.instructions, &task, &tools, context);
    let text = match tokio::time::timeout(request_timeout, invocation).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(agent = %agent_name, error = %e, "engine invocation failed");
            return Verdict::escalate(
                agent_name,
                EXECUTION_ERROR_REASON,
                format!("Agent execution failed: {e}"),
            );
        }
        Err(_) => {
            warn!(agent = %agent_name, timeout_secs = request_timeout.as_secs(), "engine invocation timed out");
            return Verdict::escalate(
                agent_name,
                TIMEOUT_REASON,
                format!(
                    "Agent invocation exceeded the {}s request timeout",
                    request_timeout.as_secs()
                ),
            );
        }
    };

    match extract_verdict(&text) {
        Ok(verdict) => {
            debug!(agent = %agent_name, status = %verdict.status, "verdict extracted");
            verdict
        }
        Err(e) => {
            warn!(agent = %agent_name, error = %e, "could not extract verdict from output");
            Verdict::escalate(
                agent_name,
                PARSING_ERROR_REASON,
                format!("Failed to parse agent response: {e}"),
            )
        }
    }
}
