//! Decision module - what the user is deciding and what the model answered.
//!
//! - `DecisionCategory` - broad area of the dilemma
//! - `DynamicParameter` - per-session tunable inputs (slider/toggle/select)
//! - `UserPreferences` - the full input to a comparison
//! - `ParameterSuggestions` - synthesized setup, with a fixed fallback
//! - `ComparisonResponse` - the normalized, scored options

mod category;
mod comparison;
mod parameter;
mod preferences;
mod suggestions;

pub use category::DecisionCategory;
pub use comparison::{
    ComparisonOption, ComparisonResponse, Metric, MetricRow, OptionScore, Scores, DEFAULT_SCORE,
    FALLBACK_OPTION_NAME, FALLBACK_OVERVIEW, FALLBACK_RECOMMENDATION, FALLBACK_SUMMARY,
};
pub use parameter::{
    DynamicParameter, ParameterControl, ParameterKind, ParameterValue, RawParameter,
    DEFAULT_SLIDER_MAX, DEFAULT_SLIDER_MIN,
};
pub use preferences::{UserPreferences, MAX_PRIORITIES};
pub use suggestions::{fallback_priorities, ParameterSuggestions, FALLBACK_PRIORITIES};
