//! Instruction template loading.
//!
//! Prompt text is opaque configuration: operators may drop a
//! `<slug>/prompt.md` file under a prompt directory to override any
//! agent's instructions. Without an override the embedded fallback
//! template is used, which carries the verdict-shape directive.

use std::path::Path;

use tracing::{debug, warn};

use crate::agents::roster::AgentKind;

/// Load the instruction template for `kind`.
///
/// File overrides win; the embedded fallback is always available, so this
/// never fails.
pub fn load_instructions(kind: AgentKind, prompt_dir: Option<&Path>) -> String {
    if let Some(dir) = prompt_dir {
        let path = dir.join(kind.slug()).join("prompt.md");
        match std::fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(agent = %kind, path = %path.display(), "loaded prompt override");
                return text.trim().to_string();
            }
            Ok(_) => {
                warn!(agent = %kind, path = %path.display(), "empty prompt override ignored");
            }
            Err(_) => {}
        }
    }
    fallback_instructions(kind)
}

/// Embedded default template mirroring the on-disk prompt contract.
fn fallback_instructions(kind: AgentKind) -> String {
    format!(
        "You are {name}, an agent for auto insurance claim processing.\n\
         {summary}.\n\n\
         Use your available tools to gather information and make a decision.\n\
         Return your decision in JSON format:\n\
         {{\n\
           \"agent\": \"{name}\",\n\
           \"status\": \"APPROVED | REJECTED | PARTIAL | ESCALATE\",\n\
           \"reason\": \"concise_slug_snake_case\",\n\
           \"explanation\": \"1-2 sentence human-readable rationale\"\n\
         }}",
        name = kind.name(),
        summary = kind.role_summary(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_names_the_agent_and_shape() {
        let text = load_instructions(AgentKind::PolicyValidator, None);
        assert!(text.contains("PolicyValidator"));
        assert!(text.contains("\"status\""));
        assert!(text.contains("ESCALATE"));
    }

    #[test]
    fn test_file_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let agent_dir = dir.path().join("fraud_detector");
        std::fs::create_dir_all(&agent_dir).unwrap();
        std::fs::write(agent_dir.join("prompt.md"), "Custom fraud directive.\n").unwrap();

        let text = load_instructions(AgentKind::FraudDetector, Some(dir.path()));
        assert_eq!(text, "Custom fraud directive.");
    }

    #[test]
    fn test_missing_override_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let text = load_instructions(AgentKind::DriverVerifier, Some(dir.path()));
        assert!(text.contains("DriverVerifier"));
    }

    #[test]
    fn test_empty_override_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let agent_dir = dir.path().join("claim_decider");
        std::fs::create_dir_all(&agent_dir).unwrap();
        std::fs::write(agent_dir.join("prompt.md"), "   \n").unwrap();

        let text = load_instructions(AgentKind::ClaimDecider, Some(dir.path()));
        assert!(text.contains("ClaimDecider"));
    }
}
