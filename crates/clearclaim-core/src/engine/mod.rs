//! Reasoning-engine boundary.
//!
//! The engine is an external black box: it accepts instructions plus a tool
//! schema, may request zero or more tool calls, and finishes with free-form
//! text. Everything above this boundary is provider-agnostic; the concrete
//! wire lives in [`http`], and tests inject deterministic stubs.

pub mod http;
pub mod provider;

use async_trait::async_trait;

use crate::tools::{ToolError, ToolSpec};

pub use http::HttpChatEngine;
pub use provider::Provider;

/// Errors raised while talking to a reasoning engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("engine returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("engine returned no usable message")]
    EmptyResponse,

    #[error("tool call failed: {0}")]
    Tool(#[from] ToolError),

    #[error("engine exceeded {limit} tool rounds without a final answer")]
    ToolRoundsExceeded { limit: usize },

    #[error("missing credential: set {0}")]
    MissingCredential(String),
}

/// Executes tool calls requested by the engine mid-invocation.
///
/// Tools are pure projections of claim facts, so execution is synchronous.
pub trait ToolExecutor: Send + Sync {
    fn execute(&self, name: &str, arguments: &serde_json::Value) -> Result<String, ToolError>;
}

/// One logical reasoning operation.
///
/// `instructions` is the agent's system directive, `task` the user-turn
/// message, and `tools` the schema of accessors the engine may request
/// through `executor` before emitting its final text.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn invoke(
        &self,
        instructions: &str,
        task: &str,
        tools: &[ToolSpec],
        executor: &dyn ToolExecutor,
    ) -> Result<String, EngineError>;
}
