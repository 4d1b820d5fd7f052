//! clearclaim core library
//!
//! Orchestrates multi-agent auto insurance claim processing:
//! - nine specialist agents render independent verdicts against one claim
//! - each verdict is extracted from free-form reasoning output and every
//!   agent failure degrades to a valid ESCALATE verdict
//! - a decider reduces the sequence to one final disposition under the
//!   REJECTED > ESCALATE > PARTIAL > APPROVED precedence hierarchy

pub mod aggregate;
pub mod agents;
pub mod config;
pub mod context;
pub mod decode;
pub mod domain;
pub mod engine;
pub mod pipeline;
pub mod telemetry;
pub mod tools;
pub mod workflow;

pub use aggregate::fallback_decision;
pub use agents::{AgentContract, AgentKind, Roster};
pub use config::Settings;
pub use context::ClaimContext;
pub use decode::{extract_verdict, DecodeError};
pub use domain::{ClaimError, ClaimFacts, ClaimRun, Result, Verdict, VerdictStatus, WorkflowStage};
pub use engine::{EngineError, HttpChatEngine, Provider, ReasoningEngine, ToolExecutor};
pub use pipeline::ExecutionMode;
pub use telemetry::init_tracing;
pub use tools::{ToolError, ToolKind, ToolSpec};
pub use workflow::ClaimWorkflow;
