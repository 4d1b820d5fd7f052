//! Runtime configuration, resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::engine::Provider;
use crate::pipeline::ExecutionMode;

/// Settings for one workflow instance.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: Provider,
    /// Model override; `None` uses the provider's default model.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Bound on each engine invocation, including tool rounds.
    pub request_timeout: Duration,
    pub execution: ExecutionMode,
    /// Route the final decision straight to the deterministic hierarchy,
    /// skipping the ClaimDecider reasoning call.
    pub skip_reasoned_decision: bool,
    /// Directory of per-agent `<slug>/prompt.md` instruction overrides.
    pub prompt_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let provider = Provider::OpenAi;
        Settings {
            provider,
            model: None,
            temperature: 0.1,
            max_tokens: 1000,
            request_timeout: Duration::from_secs(60),
            execution: ExecutionMode::Sequential {
                delay: provider.inter_call_delay(),
            },
            skip_reasoned_decision: false,
            prompt_dir: None,
        }
    }
}

impl Settings {
    /// Resolve settings from `CLEARCLAIM_*` environment variables.
    /// Unset or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        let provider = match std::env::var("CLEARCLAIM_PROVIDER") {
            Ok(raw) => match raw.parse::<Provider>() {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "ignoring CLEARCLAIM_PROVIDER");
                    Provider::OpenAi
                }
            },
            Err(_) => Provider::OpenAi,
        };

        let concurrent = env_flag("CLEARCLAIM_CONCURRENT");
        let pacing_override = env_parse::<u64>("CLEARCLAIM_PACING_MS").map(Duration::from_millis);

        Settings {
            provider,
            model: std::env::var("CLEARCLAIM_MODEL").ok().filter(|m| !m.is_empty()),
            temperature: env_parse("CLEARCLAIM_TEMPERATURE").unwrap_or(0.1),
            max_tokens: env_parse("CLEARCLAIM_MAX_TOKENS").unwrap_or(1000),
            request_timeout: Duration::from_secs(
                env_parse("CLEARCLAIM_TIMEOUT_SECS").unwrap_or(60),
            ),
            execution: Self::execution_mode(provider, concurrent, pacing_override),
            skip_reasoned_decision: env_flag("CLEARCLAIM_SKIP_REASONED_DECISION"),
            prompt_dir: std::env::var("CLEARCLAIM_PROMPT_DIR").ok().map(PathBuf::from),
        }
    }

    /// Execution mode for a provider: concurrent drops the pacing
    /// requirement entirely; sequential spaces calls by the provider's
    /// rate-limit delay unless overridden.
    pub fn execution_mode(
        provider: Provider,
        concurrent: bool,
        pacing_override: Option<Duration>,
    ) -> ExecutionMode {
        if concurrent {
            ExecutionMode::Concurrent
        } else {
            ExecutionMode::Sequential {
                delay: pacing_override.unwrap_or_else(|| provider.inter_call_delay()),
            }
        }
    }

    /// Model to request from the engine.
    pub fn resolved_model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
