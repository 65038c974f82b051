//! Completion service capability and an OpenAI-compatible HTTP client

use crate::config::Config;
use crate::error::{Result, ResumeRefinerError};
use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MAX_ERROR_BODY_BYTES: usize = 2048;

/// Prompt in, raw completion text out
pub trait Completer {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct ChatClientSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl ChatClientSettings {
    /// Settings from config, reading the API key from the configured environment variable
    pub fn from_config(config: &Config) -> Self {
        let api_key = std::env::var(&config.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            base_url: config.llm.base_url.trim_end_matches('/').to_string(),
            model: config.models.llm_model.clone(),
            api_key,
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout: Duration::from_secs(config.llm.timeout_secs),
            max_retries: config.llm.max_retries,
            initial_backoff: Duration::from_millis(config.llm.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.llm.max_backoff_ms),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestFailure {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("response contained no completion text")]
    EmptyCompletion,
}

impl RequestFailure {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Upstream { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::EmptyCompletion => false,
        }
    }
}

impl From<RequestFailure> for ResumeRefinerError {
    fn from(err: RequestFailure) -> Self {
        ResumeRefinerError::Completion(err.to_string())
    }
}

/// Client for `POST {base_url}/chat/completions`
pub struct ChatCompletionClient {
    settings: ChatClientSettings,
    http: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(settings: ChatClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("resume-refiner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { settings, http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = ChatClientSettings::from_config(config);
        if settings.api_key.is_none() {
            warn!(
                "{} is not set; sending completion requests without authorization",
                config.llm.api_key_env
            );
        }
        Self::new(settings)
    }

    pub fn settings(&self) -> &ChatClientSettings {
        &self.settings
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> std::result::Result<String, RequestFailure> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_limited_text(response).await;
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(RequestFailure::Upstream { status, message });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(RequestFailure::EmptyCompletion)
    }
}

impl Completer for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.send_once(&request).await {
                Ok(text) => {
                    debug!(
                        "Completion received from {} ({} chars, attempt {})",
                        self.settings.model,
                        text.len(),
                        attempt
                    );
                    return Ok(text);
                }
                Err(e) => {
                    if attempt > self.settings.max_retries || !e.is_retryable() {
                        return Err(e.into());
                    }
                    let delay = backoff_delay(
                        self.settings.initial_backoff,
                        self.settings.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        "Completion request failed (attempt {}), retrying in {:?}: {}",
                        attempt, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

/// Exponential backoff with up to 25% jitter, capped at `max`
fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let base_ms = initial.as_millis().min(u128::from(u64::MAX)) as u64;
    let scaled = base_ms.saturating_mul(1u64 << exponent.min(16));
    let capped = scaled.min(max.as_millis().min(u128::from(u64::MAX)) as u64);
    let jitter = pseudo_jitter_ms(capped / 4);
    Duration::from_millis(capped.saturating_add(jitter).min(max.as_millis() as u64))
}

fn pseudo_jitter_ms(max_inclusive: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .subsec_nanos() as u64;
    nanos % (max_inclusive + 1)
}

async fn read_limited_text(response: reqwest::Response) -> String {
    match response.bytes().await {
        Ok(mut bytes) => {
            bytes.truncate(MAX_ERROR_BODY_BYTES);
            String::from_utf8_lossy(&bytes).to_string()
        }
        Err(e) => {
            warn!("Failed to read upstream error body: {}", e);
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}
