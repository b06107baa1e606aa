use async_trait::async_trait;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;

use crate::error::QuizError;
use crate::logger;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// One chat-completion call: a model, its sampling limits and the conversation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    #[serde(flatten)]
    pub config: ModelConfig,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn single(config: ModelConfig, prompt: impl Into<String>) -> Self {
        Self {
            config,
            messages: vec![ChatMessage::user(prompt)],
        }
    }

    /// The last user message, which is where every prompt in this crate lives.
    #[cfg(test)]
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// A chat-completion service that turns a request into raw response text.
///
/// Futures are not required to be `Send`; gateways are driven by the single
/// AI worker on a current-thread runtime.
#[async_trait(?Send)]
pub trait LlmGateway {
    async fn complete(&self, request: ChatRequest) -> Result<String, QuizError>;
}

#[async_trait(?Send)]
impl<T: LlmGateway + ?Sized> LlmGateway for Box<T> {
    async fn complete(&self, request: ChatRequest) -> Result<String, QuizError> {
        (**self).complete(request).await
    }
}

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
}

impl OpenRouterClient {
    /// Reads `OPENROUTER_API_KEY` from the environment.
    pub fn new() -> Result<Self, QuizError> {
        let client = openrouter_api::OpenRouterClient::quick().map_err(|e| {
            QuizError::GatewayUnavailable(format!("Failed to create OpenRouter client: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl LlmGateway for OpenRouterClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, QuizError> {
        let ChatRequest { config, messages } = request;
        logger::log(&format!(
            "Gateway request to {} ({} messages)",
            config.model,
            messages.len()
        ));

        let messages = messages
            .iter()
            .map(|m| Message::text(&m.role, &m.content))
            .collect();

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let request = ChatCompletionRequest {
            model: config.model,
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let chat = self
            .client
            .chat()
            .map_err(|e| QuizError::GatewayUnavailable(e.to_string()))?;
        let response = chat
            .chat_completion(request)
            .await
            .map_err(|e| QuizError::Gateway(format!("OpenRouter API error: {}", e)))?;

        let choice = response.choices.first().ok_or(QuizError::EmptyResponse)?;
        let text = match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => text.clone(),
            openrouter_api::MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| {
                    if let openrouter_api::ContentPart::Text(tc) = p {
                        Some(tc.text.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<String>>()
                .join("\n"),
        };
        logger::log(&format!("Gateway response: {}", text));
        Ok(text)
    }
}

/// Stand-in used when no client could be built; every call reports why.
#[derive(Debug, Clone)]
pub struct UnavailableGateway {
    reason: String,
}

impl UnavailableGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait(?Send)]
impl LlmGateway for UnavailableGateway {
    async fn complete(&self, _request: ChatRequest) -> Result<String, QuizError> {
        Err(QuizError::GatewayUnavailable(self.reason.clone()))
    }
}
