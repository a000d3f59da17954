//! Parameter synthesizer port.
//!
//! Turns a category and problem statement into the dynamic parameters and
//! priority suggestions a session starts with.

use async_trait::async_trait;

use crate::domain::decision::{DecisionCategory, ParameterSuggestions};

/// Port for setting up a session's parameters.
///
/// Infallible: implementations absorb every failure and return
/// [`ParameterSuggestions::fallback`] so setup never dead-ends.
#[async_trait]
pub trait ParameterSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        category: DecisionCategory,
        problem_statement: &str,
    ) -> ParameterSuggestions;
}
