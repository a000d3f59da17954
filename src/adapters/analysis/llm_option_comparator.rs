//! Option comparison backed by an AI provider.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::schemas::COMPARISON_SCHEMA;
use crate::domain::decision::{ComparisonResponse, UserPreferences};
use crate::domain::extraction::ResponseExtractor;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, OptionComparator, RequestMetadata,
};

const SYSTEM_INSTRUCTION: &str =
    "You are The Referee, a neutral decision analyst. Return strictly valid JSON.";

/// Generation limits for comparison requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonLimits {
    pub max_output_tokens: u32,
    pub thinking_budget: u32,
}

impl Default for ComparisonLimits {
    fn default() -> Self {
        Self {
            max_output_tokens: 4000,
            thinking_budget: 1500,
        }
    }
}

/// Asks the provider to identify and score 2-3 options.
pub struct LlmOptionComparator {
    provider: Arc<dyn AIProvider>,
    model: String,
    limits: ComparisonLimits,
    extractor: ResponseExtractor,
}

impl LlmOptionComparator {
    pub fn new(provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            limits: ComparisonLimits::default(),
            extractor: ResponseExtractor::new(),
        }
    }

    pub fn with_limits(mut self, limits: ComparisonLimits) -> Self {
        self.limits = limits;
        self
    }

    fn build_prompt(preferences: &UserPreferences) -> String {
        let constraints = preferences
            .dynamic_params
            .iter()
            .map(|p| p.prompt_line())
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Dilemma: \"{}\"\n\
             Category: \"{}\"\n\
             Constraints:\n\
             {}\n\
             Priorities: {}\n\n\
             Identify and score 2-3 distinct, viable options. Provide a clear recommendation.",
            preferences.problem_statement,
            preferences.category.display_name(),
            constraints,
            preferences.priorities.join(", ")
        )
    }
}

#[async_trait]
impl OptionComparator for LlmOptionComparator {
    async fn compare(&self, preferences: &UserPreferences) -> Result<ComparisonResponse, AIError> {
        let trace_id = Uuid::new_v4().to_string();
        let request = CompletionRequest::new(RequestMetadata::new(trace_id.clone()))
            .with_model(self.model.clone())
            .with_message(MessageRole::User, Self::build_prompt(preferences))
            .with_system_prompt(SYSTEM_INSTRUCTION)
            .with_json_schema(COMPARISON_SCHEMA.clone())
            .with_max_tokens(self.limits.max_output_tokens)
            .with_thinking_budget(self.limits.thinking_budget);

        let response = self.provider.complete(request).await.map_err(|e| {
            tracing::warn!(error = %e, %trace_id, "Comparison analysis failed");
            e
        })?;

        let data = self.extractor.extract(&response.content);
        let result = ComparisonResponse::from_extracted(&data);

        tracing::info!(
            %trace_id,
            options = result.options.len(),
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Comparison completed"
        );

        Ok(result)
    }
}
