//! OpenAI-compatible chat-completions engine.
//!
//! Drives the reasoning loop over HTTP: send instructions plus the tool
//! schema, execute any tool calls the model requests, feed the results
//! back, and return the model's final text. All four providers expose this
//! wire at their respective base URLs.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::engine::provider::Provider;
use crate::engine::{EngineError, ReasoningEngine, ToolExecutor};
use crate::tools::ToolSpec;

/// Upper bound on model->tool->model round trips in one invocation.
const MAX_TOOL_ROUNDS: usize = 8;

/// Connection and sampling parameters for one engine instance.
#[derive(Debug, Clone)]
pub struct HttpEngineConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    /// Low temperature keeps verdicts consistent across runs.
    pub temperature: f32,
    pub max_tokens: u32,
}

impl HttpEngineConfig {
    /// Build a config for `provider`, reading the key from its environment
    /// variable and using its default model.
    pub fn from_env(provider: Provider) -> Result<Self, EngineError> {
        let api_key = std::env::var(provider.credential_env())
            .map_err(|_| EngineError::MissingCredential(provider.credential_env().to_string()))?;
        Ok(HttpEngineConfig {
            provider,
            api_key,
            model: provider.default_model().to_string(),
            temperature: 0.1,
            max_tokens: 1000,
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Reasoning engine backed by an OpenAI-compatible chat-completions API.
pub struct HttpChatEngine {
    config: HttpEngineConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    id: String,
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded argument object, as the wire delivers it.
    arguments: String,
}

impl HttpChatEngine {
    pub fn new(config: HttpEngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("clearclaim/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpChatEngine { config, client })
    }

    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    fn tool_schema(tools: &[ToolSpec]) -> Vec<serde_json::Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect()
    }

    async fn complete(&self, messages: &[serde_json::Value], tools: &[ToolSpec]) -> Result<AssistantMessage, EngineError> {
        let url = format!("{}/chat/completions", self.config.provider.base_url());
        let mut body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = serde_json::Value::Array(Self::tool_schema(tools));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(EngineError::EmptyResponse)
    }
}

#[async_trait]
impl ReasoningEngine for HttpChatEngine {
    async fn invoke(
        &self,
        instructions: &str,
        task: &str,
        tools: &[ToolSpec],
        executor: &dyn ToolExecutor,
    ) -> Result<String, EngineError> {
        let mut messages = vec![
            json!({"role": "system", "content": instructions}),
            json!({"role": "user", "content": task}),
        ];

        for round in 0..MAX_TOOL_ROUNDS {
            let message = self.complete(&messages, tools).await?;

            if message.tool_calls.is_empty() {
                return message
                    .content
                    .filter(|c| !c.trim().is_empty())
                    .ok_or(EngineError::EmptyResponse);
            }

            debug!(round, calls = message.tool_calls.len(), "executing tool round");

            // Echo the assistant turn (with its tool_calls) before the
            // tool results, as the wire requires.
            messages.push(json!({
                "role": "assistant",
                "content": message.content,
                "tool_calls": message.tool_calls.iter().map(|c| json!({
                    "id": c.id,
                    "type": "function",
                    "function": {"name": c.function.name, "arguments": c.function.arguments},
                })).collect::<Vec<_>>(),
            }));

            for call in &message.tool_calls {
                let arguments: serde_json::Value =
                    serde_json::from_str(&call.function.arguments).unwrap_or(json!({}));
                // A failing tool is reported back to the model instead of
                // aborting the invocation; the model can still conclude.
                let content = match executor.execute(&call.function.name, &arguments) {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!(tool = %call.function.name, error = %e, "tool call failed");
                        format!("Tool error: {e}")
                    }
                };
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": content,
                }));
            }
        }

        Err(EngineError::ToolRoundsExceeded {
            limit: MAX_TOOL_ROUNDS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolKind;

    #[test]
    fn test_tool_schema_shape() {
        let tools = [ToolKind::PolicyInformation.spec(), ToolKind::DaysBetweenDates.spec()];
        let schema = HttpChatEngine::tool_schema(&tools);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0]["type"], "function");
        assert_eq!(schema[0]["function"]["name"], "get_policy_information");
        assert!(schema[1]["function"]["parameters"]["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::Value::String("start_date".into())));
    }

    #[test]
    fn test_response_with_tool_calls_deserializes() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_policy_information", "arguments": "{}"}
                    }]
                }
            }]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let message = &parsed.choices[0].message;
        assert!(message.content.is_none());
        assert_eq!(message.tool_calls[0].function.name, "get_policy_information");
    }

    #[test]
    fn test_final_text_response_deserializes() {
        let raw = r#"{"choices":[{"message":{"content":"{\"agent\":\"X\"}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.tool_calls.is_empty());
        assert!(parsed.choices[0].message.content.is_some());
    }

    fn config() -> HttpEngineConfig {
        HttpEngineConfig {
            provider: Provider::OpenAi,
            api_key: "test-key".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.1,
            max_tokens: 1000,
        }
    }

    #[test]
    fn test_builder_setters_override_defaults() {
        let config = config()
            .with_model("gpt-3.5-turbo")
            .with_temperature(0.7)
            .with_max_tokens(2000);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_engine_constructs_from_explicit_config() {
        let engine = HttpChatEngine::new(config()).unwrap();
        assert_eq!(engine.provider(), Provider::OpenAi);
    }

    #[test]
    fn test_config_from_env_requires_credential() {
        // Credential env deliberately unset for this provider in tests.
        std::env::remove_var("GROQ_API_KEY");
        let err = HttpEngineConfig::from_env(Provider::Groq).unwrap_err();
        assert!(matches!(err, EngineError::MissingCredential(_)));
    }
}
