// src/analyze/llm.rs
// LLM completion connector (OpenAI Chat Completions wire shape).
//
// Each failure mode is a distinct kind so the API layer can map them to
// distinct statuses. No retries here; failures surface on the first attempt.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Fixed system instruction sent with every completion. Stable across calls.
pub const SYSTEM_INSTRUCTION: &str = "You are a startup analyst. Respond ONLY in valid JSON \
     with all numeric values as numbers, not strings.";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingKey,
    #[error("LLM upstream error: {0}")]
    Upstream(String),
    #[error("LLM rate limit exceeded")]
    RateLimited,
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the composed prompt and return the raw assistant message text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// `model_override`: pass Some("gpt-4o") to override; defaults to gpt-4o-mini.
    pub fn new(api_key: &str, model_override: Option<&str>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("startup-analyzer/0.1")
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: api_key.to_string(),
            model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingKey);
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            // Moderate sampling: identical prompts may yield different JSON
            // across calls; the normalizer tolerates that.
            temperature: 0.7,
        };

        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| LlmError::Upstream(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "LLM upstream error");
            return Err(LlmError::Upstream(format!("status {status}")));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| LlmError::Upstream(e.to_string()))?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .unwrap_or("");
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Deterministic connector for offline/test mode: replies with a fixed text.
#[derive(Clone)]
pub struct MockLlm {
    pub fixed: String,
}

impl Default for MockLlm {
    fn default() -> Self {
        Self {
            fixed: r#"{"market_score": 7.0, "team_score": 7.0, "technology_score": 7.0,
                       "traction_score": 6.5, "overall_score": 6.9,
                       "success_probability": 0.6, "unicorn_probability": 0.1,
                       "market_growth": 0.4, "market_potential": 0.7,
                       "strengths": ["offline mode"], "risks": ["offline mode"],
                       "recommendations": ["configure OPENAI_API_KEY"]}"#
                .to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.fixed.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
