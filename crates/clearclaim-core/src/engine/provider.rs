//! Reasoning-engine provider matrix.
//!
//! Four interchangeable backends, each with its own credential, default
//! model, and rate-limit characteristics. All of them are reached through
//! their OpenAI-compatible chat-completions endpoint so a single HTTP
//! client covers the matrix.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ClaimError;

/// Supported reasoning-engine backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Groq,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::Groq,
    ];

    /// Human-readable provider name.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic Claude",
            Provider::Google => "Google Gemini",
            Provider::Groq => "Groq (Llama)",
        }
    }

    /// OpenAI-compatible chat-completions base URL.
    pub fn base_url(self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
            Provider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_env(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Google => "GOOGLE_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4-turbo-preview",
            Provider::Anthropic => "claude-3-5-sonnet-20241022",
            Provider::Google => "gemini-1.5-pro",
            Provider::Groq => "llama-3.1-70b-versatile",
        }
    }

    pub fn known_models(self) -> &'static [&'static str] {
        match self {
            Provider::OpenAi => &["gpt-4-turbo-preview", "gpt-4", "gpt-3.5-turbo"],
            Provider::Anthropic => &[
                "claude-3-5-sonnet-20241022",
                "claude-3-opus-20240229",
                "claude-3-haiku-20240307",
            ],
            Provider::Google => &["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.0-pro"],
            Provider::Groq => &[
                "llama-3.1-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
            ],
        }
    }

    /// Spacing between sequential agent invocations, sized to each
    /// provider's rate limits. Concurrent execution ignores this.
    pub fn inter_call_delay(self) -> Duration {
        match self {
            Provider::OpenAi => Duration::from_millis(500),
            Provider::Anthropic => Duration::from_millis(500),
            Provider::Google => Duration::from_millis(250),
            Provider::Groq => Duration::from_millis(100),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Groq => "groq",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Provider {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "google" => Ok(Provider::Google),
            "groq" => Ok(Provider::Groq),
            other => Err(ClaimError::UnsupportedProvider(other.to_string())),
        }
    }
}
