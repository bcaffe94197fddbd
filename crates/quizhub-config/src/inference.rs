//! Hosted inference API settings for hint and feedback generation.
//!
//! # Environment Variables
//!
//! - `INFERENCE_API_URL`: base URL (default `https://api-inference.huggingface.co/models`)
//! - `INFERENCE_API_TOKEN`: bearer token; hints are disabled when unset
//! - `INFERENCE_MODEL`: model path appended to the base URL
//! - `INFERENCE_MAX_NEW_TOKENS`: generation length cap (default 150)
//! - `INFERENCE_TIMEOUT_SECS`: request timeout (default 30)

use std::env;

use crate::env_parse;

#[derive(Clone)]
pub struct InferenceConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub model: String,
    pub max_new_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-inference.huggingface.co/models".to_string(),
            api_token: None,
            model: "google/flan-t5-large".to_string(),
            max_new_tokens: 150,
            timeout_secs: 30,
        }
    }
}

impl InferenceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("INFERENCE_API_URL").unwrap_or(defaults.api_url),
            api_token: env::var("INFERENCE_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            model: env::var("INFERENCE_MODEL").unwrap_or(defaults.model),
            max_new_tokens: env_parse("INFERENCE_MAX_NEW_TOKENS")
                .unwrap_or(defaults.max_new_tokens),
            timeout_secs: env_parse("INFERENCE_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }
}

// The token stays out of debug output and logs.
impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
