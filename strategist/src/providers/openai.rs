//! Generator for OpenAI-compatible chat completion APIs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::errors::GenerationError;
use crate::stages::{PromptPayload, RawStageResult, StageRequest, TaskOutput, TextGenerator};

/// A message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the sender ("system" or "user").
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Calls `POST {api_base}/chat/completions` once per stage.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    config: GenerationConfig,
    http_client: Client,
}

impl OpenAiCompatibleGenerator {
    /// Creates a generator from configuration.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let timeout = config
            .timeout()
            .map_err(|e| GenerationError::InvalidRequest(e.to_string()))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// The configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Maps a prompt payload onto chat messages.
    ///
    /// Structured prompts put the persona in a system message and the task
    /// in a user message.
    #[must_use]
    pub fn build_messages(prompt: &PromptPayload) -> Vec<ChatMessage> {
        match prompt {
            PromptPayload::Text { text } => vec![ChatMessage::user(text.clone())],
            PromptPayload::Structured {
                role,
                backstory,
                description,
                expected_output,
            } => vec![
                ChatMessage::system(format!("You are the {role}. {backstory}")),
                ChatMessage::user(format!("{description}\n\nExpected output: {expected_output}")),
            ],
        }
    }

    /// Parses a successful response body into a raw stage result.
    pub fn parse_completion(body: &str) -> Result<RawStageResult, GenerationError> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| GenerationError::Malformed(format!("failed to parse API response: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::Malformed("response contained no choices".to_string()))?;

        Ok(RawStageResult::Task(TaskOutput {
            raw: choice.message.content,
            finish_reason: choice.finish_reason,
            ..TaskOutput::default()
        }))
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            GenerationError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, request: &StageRequest) -> Result<RawStageResult, GenerationError> {
        let api_request = ApiRequest {
            model: &self.config.model,
            messages: Self::build_messages(&request.prompt),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.config.completions_url();
        tracing::debug!(%url, model = %self.config.model, stage = request.stage.as_str(), "Sending completion request");

        let mut http_request = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let http_response = http_request
            .json(&api_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = http_response.status();
        let body = http_response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |parsed| parsed.error.message);
            tracing::warn!(status = status.as_u16(), %message, "Completion request rejected");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Self::parse_completion(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structured_prompt_messages() {
        let prompt = PromptPayload::Structured {
            role: "Solution Architect".into(),
            backstory: "You design MVPs.".into(),
            description: "Plan the MVP.".into(),
            expected_output: "A plan.".into(),
        };
        let messages = OpenAiCompatibleGenerator::build_messages(&prompt);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "You are the Solution Architect. You design MVPs.");
        assert_eq!(messages[1].content, "Plan the MVP.\n\nExpected output: A plan.");
    }

    #[test]
    fn test_text_prompt_messages() {
        let messages = OpenAiCompatibleGenerator::build_messages(&PromptPayload::text("hi"));
        assert_eq!(messages, vec![ChatMessage::user("hi")]);
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"The plan"},"finish_reason":"stop"}]}"#;
        let raw = OpenAiCompatibleGenerator::parse_completion(body).unwrap();

        assert_eq!(raw.primary_text(), Some("The plan"));
        assert_eq!(raw.finish_reason(), Some("stop"));
    }

    #[test]
    fn test_parse_completion_null_content() {
        let body = r#"{"choices":[{"message":{"content":null},"finish_reason":"length"}]}"#;
        let raw = OpenAiCompatibleGenerator::parse_completion(body).unwrap();
        assert_eq!(raw.primary_text(), None);
    }

    #[test]
    fn test_parse_completion_malformed() {
        for body in ["not json", r#"{"choices":[]}"#] {
            let err = OpenAiCompatibleGenerator::parse_completion(body).unwrap_err();
            assert_eq!(err.error_type(), "malformed_response");
        }
    }

    #[test]
    fn test_new_from_config() {
        let generator =
            OpenAiCompatibleGenerator::new(GenerationConfig::default().with_model("m")).unwrap();
        assert_eq!(generator.model(), "m");
        assert!(!generator.has_api_key());
    }

    #[test]
    fn test_unrepresentable_timeout_is_rejected() {
        let err = OpenAiCompatibleGenerator::new(GenerationConfig::default().with_timeout(1e30))
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(ref msg) if msg.contains("timeout_seconds")));
    }
}
