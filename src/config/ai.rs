//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{
    worst_case_call, DEFAULT_ANALYSIS_MODEL, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use crate::adapters::analysis::ComparisonLimits;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider backs synthesis and comparison
    #[serde(default)]
    pub provider: AiProvider,

    /// Gemini API key
    pub gemini_api_key: Option<Secret<String>>,

    /// Gemini API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used to synthesize parameters
    #[serde(default = "default_model")]
    pub setup_model: String,

    /// Model used to compare options
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Output token cap for comparisons
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Reasoning token budget for comparisons
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// Retries on retryable provider failures
    #[serde(default)]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    /// Canned responses, no network. For local development.
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Longest a single provider call can take, retries included
    pub fn worst_case_call(&self) -> Duration {
        worst_case_call(self.timeout(), self.max_retries)
    }

    /// Check if a Gemini key is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Token limits applied to comparison requests
    pub fn comparison_limits(&self) -> ComparisonLimits {
        ComparisonLimits {
            max_output_tokens: self.max_output_tokens,
            thinking_budget: self.thinking_budget,
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProvider::Gemini && !self.has_gemini() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.setup_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("setup"));
        }
        if self.analysis_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("analysis"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidAiTimeout);
        }
        if self.max_output_tokens <= self.thinking_budget {
            return Err(ValidationError::InvalidTokenBudget);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        let limits = ComparisonLimits::default();
        Self {
            provider: AiProvider::default(),
            gemini_api_key: None,
            base_url: default_base_url(),
            setup_model: default_model(),
            analysis_model: default_analysis_model(),
            timeout_secs: default_timeout(),
            max_output_tokens: limits.max_output_tokens,
            thinking_budget: limits.thinking_budget,
            max_retries: 0,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_analysis_model() -> String {
    DEFAULT_ANALYSIS_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    ComparisonLimits::default().max_output_tokens
}

fn default_thinking_budget() -> u32 {
    ComparisonLimits::default().thinking_budget
}
