//! Parameter synthesis backed by an AI provider.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::schemas::PARAMETER_SCHEMA;
use crate::domain::decision::{
    fallback_priorities, DecisionCategory, DynamicParameter, ParameterSuggestions, RawParameter,
};
use crate::domain::extraction::ResponseExtractor;
use crate::ports::{AIProvider, CompletionRequest, MessageRole, ParameterSynthesizer, RequestMetadata};

const SYSTEM_INSTRUCTION: &str =
    "You are The Referee. Provide strictly valid JSON following the schema. Be precise and objective.";

/// Asks the provider for 4-6 tunable parameters for a dilemma.
///
/// Never fails: provider errors and unusable output both yield
/// [`ParameterSuggestions::fallback`].
pub struct LlmParameterSynthesizer {
    provider: Arc<dyn AIProvider>,
    model: String,
    extractor: ResponseExtractor,
}

impl LlmParameterSynthesizer {
    pub fn new(provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            extractor: ResponseExtractor::new(),
        }
    }

    fn build_prompt(category: DecisionCategory, problem_statement: &str) -> String {
        format!(
            "Analyze this decision intent:\n\
             Category: {}\n\
             Problem: \"{}\"\n\n\
             Identify 4-6 key parameters. Use standard numeric ranges (e.g., 0-100 or specific units like USD where relevant).\n\
             Available types: 'slider', 'toggle', 'select'.",
            category.display_name(),
            problem_statement
        )
    }

    /// Builds suggestions from extracted output.
    ///
    /// Returns `None` when no usable parameter survives.
    fn suggestions_from(data: &Value) -> Option<ParameterSuggestions> {
        let mut seen = HashSet::new();
        let parameters: Vec<DynamicParameter> = data
            .get("parameters")
            .and_then(Value::as_array)?
            .iter()
            .filter_map(RawParameter::from_json)
            .enumerate()
            .map(|(index, raw)| {
                let mut param = raw.resolve(index);
                if !seen.insert(param.id.clone()) {
                    param.id = format!("{}-{}", param.id, index + 1);
                    seen.insert(param.id.clone());
                }
                param
            })
            .collect();

        if parameters.is_empty() {
            return None;
        }

        let mut suggested_priorities: Vec<String> = Vec::new();
        for priority in data
            .get("suggestedPriorities")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            if !suggested_priorities.iter().any(|p| p == priority) {
                suggested_priorities.push(priority.to_string());
            }
        }
        if suggested_priorities.is_empty() {
            suggested_priorities = fallback_priorities();
        }

        Some(ParameterSuggestions {
            parameters,
            suggested_priorities,
        })
    }
}

#[async_trait]
impl ParameterSynthesizer for LlmParameterSynthesizer {
    async fn synthesize(
        &self,
        category: DecisionCategory,
        problem_statement: &str,
    ) -> ParameterSuggestions {
        let trace_id = Uuid::new_v4().to_string();
        let request = CompletionRequest::new(RequestMetadata::new(trace_id.clone()))
            .with_model(self.model.clone())
            .with_message(
                MessageRole::User,
                Self::build_prompt(category, problem_statement),
            )
            .with_system_prompt(SYSTEM_INSTRUCTION)
            .with_json_schema(PARAMETER_SCHEMA.clone());

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, %trace_id, "Parameter synthesis failed, using fallback");
                return ParameterSuggestions::fallback();
            }
        };

        let data = self.extractor.extract(&response.content);
        match Self::suggestions_from(&data) {
            Some(suggestions) => {
                tracing::debug!(
                    %trace_id,
                    parameters = suggestions.parameters.len(),
                    "Parameters synthesized"
                );
                suggestions
            }
            None => {
                tracing::warn!(%trace_id, "Provider returned no usable parameters, using fallback");
                ParameterSuggestions::fallback()
            }
        }
    }
}
