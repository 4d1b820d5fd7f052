//! Pipeline scheduler: runs every specialist against one claim.
//!
//! Two execution models. Sequential spaces invocations with a
//! provider-keyed delay to respect external rate limits; concurrent fires
//! all agents at once. Under both, the verdict sequence comes back in the
//! fixed roster order — concurrent results are re-keyed by agent index,
//! never by completion order — and one agent's ESCALATE never aborts its
//! siblings.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::agents::roster::AgentContract;
use crate::agents::runner::{self, EXECUTION_ERROR_REASON};
use crate::context::ClaimContext;
use crate::domain::verdict::Verdict;
use crate::engine::ReasoningEngine;

/// How the specialist batch is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One agent at a time, with `delay` between consecutive invocations
    /// (not after the last).
    Sequential { delay: Duration },
    /// All agents at once; no inter-call spacing.
    Concurrent,
}

/// Run every specialist and return exactly one verdict per agent, in
/// roster order.
#[instrument(skip(engine, specialists, context), fields(agents = specialists.len()))]
pub async fn gather_verdicts(
    engine: Arc<dyn ReasoningEngine>,
    specialists: &[AgentContract],
    context: Arc<ClaimContext>,
    mode: &ExecutionMode,
    request_timeout: Duration,
) -> Vec<Verdict> {
    match mode {
        ExecutionMode::Sequential { delay } => {
            sequential(engine, specialists, context, *delay, request_timeout).await
        }
        ExecutionMode::Concurrent => {
            concurrent(engine, specialists, context, request_timeout).await
        }
    }
}

async fn sequential(
    engine: Arc<dyn ReasoningEngine>,
    specialists: &[AgentContract],
    context: Arc<ClaimContext>,
    delay: Duration,
    request_timeout: Duration,
) -> Vec<Verdict> {
    let mut verdicts = Vec::with_capacity(specialists.len());

    for (index, contract) in specialists.iter().enumerate() {
        info!(agent = %contract.kind, index, "invoking specialist");
        let verdict = runner::run_agent(engine.as_ref(), contract, &context, request_timeout).await;
        verdicts.push(verdict);

        if index + 1 < specialists.len() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    verdicts
}

async fn concurrent(
    engine: Arc<dyn ReasoningEngine>,
    specialists: &[AgentContract],
    context: Arc<ClaimContext>,
    request_timeout: Duration,
) -> Vec<Verdict> {
    let results: Arc<Mutex<Vec<(usize, Verdict)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut tasks = Vec::with_capacity(specialists.len());

    for (index, contract) in specialists.iter().enumerate() {
        let engine = Arc::clone(&engine);
        let context = Arc::clone(&context);
        let contract = contract.clone();
        let results = Arc::clone(&results);

        tasks.push(tokio::spawn(async move {
            let verdict =
                runner::run_agent(engine.as_ref(), &contract, &context, request_timeout).await;
            results.lock().await.push((index, verdict));
        }));
    }

    for (index, task) in tasks.into_iter().enumerate() {
        if task.await.is_err() {
            // A panicked task still owes its slot a verdict.
            let contract = &specialists[index];
            warn!(agent = %contract.kind, "specialist task panicked");
            results.lock().await.push((
                index,
                Verdict::escalate(
                    contract.kind.name(),
                    EXECUTION_ERROR_REASON,
                    "Agent execution failed: task panicked".to_string(),
                ),
            ));
        }
    }

    let mut collected = std::mem::take(&mut *results.lock().await);
    // Fixed roster order, not completion order.
    collected.sort_by_key(|(index, _)| *index);
    collected.into_iter().map(|(_, verdict)| verdict).collect()
}
