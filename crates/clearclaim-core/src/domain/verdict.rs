//! The response contract every agent must emit.

use serde::{Deserialize, Serialize};

/// The four dispositions an agent may render.
///
/// Serialized in SCREAMING_CASE to match the wire contract agents are
/// instructed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    Approved,
    Rejected,
    Partial,
    Escalate,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerdictStatus::Approved => "APPROVED",
            VerdictStatus::Rejected => "REJECTED",
            VerdictStatus::Partial => "PARTIAL",
            VerdictStatus::Escalate => "ESCALATE",
        };
        write!(f, "{s}")
    }
}

/// One agent's structured decision for one claim.
///
/// `reason` is a short snake_case slug; `explanation` a 1-2 sentence
/// human-readable rationale. Both are always non-empty: failure paths
/// synthesize placeholder values rather than leave them blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub agent: String,
    pub status: VerdictStatus,
    pub reason: String,
    pub explanation: String,
}

impl Verdict {
    /// Synthesize an ESCALATE verdict for a failed agent invocation or
    /// an unparseable agent output.
    pub fn escalate(agent: &str, reason: &str, explanation: String) -> Self {
        Verdict {
            agent: agent.to_string(),
            status: VerdictStatus::Escalate,
            reason: reason.to_string(),
            explanation,
        }
    }

    /// Shape check applied before a verdict enters a claim run.
    pub fn is_well_formed(&self) -> bool {
        !self.agent.trim().is_empty()
            && !self.reason.trim().is_empty()
            && !self.explanation.trim().is_empty()
    }
}
