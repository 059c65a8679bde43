//! Hosted-LLM chat client.
//!
//! Two tiers share the same client type: a fast, token-capped router model
//! for classification and a larger generation model for answers. Timeouts
//! are bounded at the HTTP layer so a hung call surfaces as a generation
//! failure instead of blocking a request forever.

use serde::{Deserialize, Serialize};

use super::orchestrator::LlmGenerate;
use super::RagError;

/// Fast model used for query classification.
pub const ROUTER_MODEL: &str = "llama-3.1-8b-instant";
/// Model used for answer generation.
pub const GENERATION_MODEL: &str = "llama-3.3-70b-versatile";

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Chat-completions client for the Groq API.
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::blocking::Client,
}

impl GroqClient {
    pub fn new(
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, RagError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagError::LlmConnection(e.to_string()))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            client,
        })
    }

    /// Router tier: 20 tokens, 15 second timeout.
    pub fn router(api_key: &str) -> Result<Self, RagError> {
        Self::new(api_key, ROUTER_MODEL, 20, 15)
    }

    /// Generation tier: 1500 tokens, 45 second timeout.
    pub fn generation(api_key: &str) -> Result<Self, RagError> {
        Self::new(api_key, GENERATION_MODEL, 1500, 45)
    }

    /// Point the client at another endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl LlmGenerate for GroqClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RagError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: system,
                },
                RequestMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| RagError::LlmConnection(e.to_string()))?;

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| RagError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RagError::ResponseParsing("empty choices array".into()))
    }
}
