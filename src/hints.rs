//! Text generation for quiz hints and answer feedback.
//!
//! Handlers talk to a [`HintProvider`] held in [`AppState`](crate::state::AppState).
//! In production that is an [`InferenceClient`] calling the hosted inference
//! API; without an API token the server runs with [`DisabledHints`] and the
//! assist endpoints answer 503.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use quizhub_config::InferenceConfig;
use quizhub_core::AppError;
use serde_json::{Value, json};
use tracing::{info, warn};

pub const NOT_CONFIGURED: &str = "Hint service is not configured";
pub const UNAVAILABLE: &str = "Hint service is unavailable";

#[derive(Debug, thiserror::Error)]
pub enum HintError {
    #[error("Hint service is not configured")]
    NotConfigured,
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("inference API returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("inference API returned no text")]
    EmptyResponse,
}

impl HintError {
    /// 503 either way; only the missing-token case tells the client why.
    pub fn into_app_error(self) -> AppError {
        match self {
            HintError::NotConfigured => AppError::service_unavailable(self),
            other => AppError::service_unavailable(anyhow::Error::new(other).context(UNAVAILABLE)),
        }
    }
}

#[async_trait]
pub trait HintProvider: Send + Sync + std::fmt::Debug {
    async fn generate(&self, prompt: &str) -> Result<String, HintError>;
}

/// Stand-in used when no inference token is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledHints;

#[async_trait]
impl HintProvider for DisabledHints {
    async fn generate(&self, _prompt: &str) -> Result<String, HintError> {
        Err(HintError::NotConfigured)
    }
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, HintError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": self.config.max_new_tokens,
            }
        })
    }
}

#[async_trait]
impl HintProvider for InferenceClient {
    async fn generate(&self, prompt: &str) -> Result<String, HintError> {
        let token = self
            .config
            .api_token
            .as_deref()
            .ok_or(HintError::NotConfigured)?;

        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(token)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Inference API request failed");
            return Err(HintError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        extract_generated_text(&value)
    }
}

/// Pulls the generated text out of an inference response. Accepts both
/// `[{"generated_text": ..}]` and a bare `{"generated_text": ..}`; an
/// `{"error": ..}` object is reported as an upstream failure.
pub fn extract_generated_text(value: &Value) -> Result<String, HintError> {
    let item = match value {
        Value::Array(items) => items.first().ok_or(HintError::EmptyResponse)?,
        other => other,
    };

    if let Some(error) = item.get("error").and_then(Value::as_str) {
        return Err(HintError::Upstream {
            status: 200,
            body: error.to_string(),
        });
    }

    item.get("generated_text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(HintError::EmptyResponse)
}

/// Builds the provider for the configured environment.
pub fn hint_provider(config: &InferenceConfig) -> anyhow::Result<Arc<dyn HintProvider>> {
    if !config.is_configured() {
        warn!("INFERENCE_API_TOKEN not set, hint and feedback endpoints are disabled");
        return Ok(Arc::new(DisabledHints));
    }

    let client = InferenceClient::new(config.clone())
        .map_err(|e| anyhow!("Failed to build inference client: {}", e))?;
    info!(model = %config.model, "Inference client ready");
    Ok(Arc::new(client))
}
