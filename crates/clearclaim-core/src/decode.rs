//! Structured-output decoder.
//!
//! Agents are instructed to terminate with exactly one JSON object in the
//! verdict shape, but reasoning engines routinely wrap it in prose. The
//! decoder locates the outermost `{...}` span of the final text and parses
//! it against the contract, with an explicit failure taxonomy so callers
//! can classify what went wrong.

use crate::domain::verdict::Verdict;

/// Why a final agent output did not yield a verdict.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no JSON object found in agent output")]
    NoJsonObject,

    #[error("agent output contained malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("agent output parsed but violates the verdict shape: {0}")]
    InvalidShape(String),
}

/// Extract one verdict from free-form engine output.
///
/// Takes the span from the first `{` to the last `}`; leading and trailing
/// prose around a single well-formed object is tolerated. Fails on a
/// missing span, malformed JSON, a missing required field, an
/// out-of-enumeration status, or blank `reason`/`explanation`/`agent`.
pub fn extract_verdict(text: &str) -> Result<Verdict, DecodeError> {
    let start = text.find('{').ok_or(DecodeError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(DecodeError::NoJsonObject)?;
    if end < start {
        return Err(DecodeError::NoJsonObject);
    }

    let verdict: Verdict = serde_json::from_str(&text[start..=end])?;
    if !verdict.is_well_formed() {
        return Err(DecodeError::InvalidShape(
            "agent, reason, and explanation must be non-empty".to_string(),
        ));
    }
    Ok(verdict)
}
