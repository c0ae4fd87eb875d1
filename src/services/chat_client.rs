use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Anything that can turn a single user prompt into reply text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String>;
}

/// Body of a chat-completion call: one user message and a temperature.
#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    prompt: String,
    temperature: f64,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn to_value(&self) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": self.prompt
                }
            ],
            "temperature": self.temperature,
        })
    }
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint. Each call is
/// a single POST; failures are returned to the caller without retrying.
#[derive(Clone, Debug)]
pub struct ChatClient {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<String> {
        let request_url = build_chat_url(&self.base_url);
        info!(model = request.model(), url = %request_url, "sending chat completion request");
        debug!(
            target: "trip_planner::http",
            prompt_chars = request.prompt().len(),
            temperature = request.temperature()
        );

        let mut builder = self
            .http
            .post(&request_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request.to_value());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| PlannerError::Transport(err.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Transport(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            return Err(status_error(status, &response_text));
        }

        let response_json: Value = serde_json::from_str(&response_text)?;
        message_content(&response_json)
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
        self.chat_completion(request).await
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

/// Server-provided error text: `error.message` when the body is JSON,
/// otherwise the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            Some(
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            )
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn status_error(status: StatusCode, body: &str) -> PlannerError {
    match status {
        StatusCode::UNAUTHORIZED => PlannerError::Unauthorized,
        StatusCode::BAD_REQUEST => PlannerError::BadRequest(api_error_message(body)),
        StatusCode::NOT_FOUND => PlannerError::EndpointNotFound,
        other => PlannerError::Http {
            status: other.as_u16(),
            message: api_error_message(body),
        },
    }
}

/// `choices[0].message.content` of a completion response.
fn message_content(response: &Value) -> Result<String> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(PlannerError::EmptyResponse)
}
