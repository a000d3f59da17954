//! Analysis adapters - synthesizer and comparator backed by an AI provider.

mod llm_option_comparator;
mod llm_parameter_synthesizer;
mod schemas;

pub use llm_option_comparator::{ComparisonLimits, LlmOptionComparator};
pub use llm_parameter_synthesizer::LlmParameterSynthesizer;
pub use schemas::{COMPARISON_SCHEMA, PARAMETER_SCHEMA};
