//! Output of parameter synthesis.

use serde::Serialize;

use super::DynamicParameter;

/// Priorities offered when the provider suggests none.
pub const FALLBACK_PRIORITIES: [&str; 4] =
    ["Cost Efficiency", "Reliability", "Speed", "Scalability"];

/// Parameters and priority suggestions for a new session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSuggestions {
    pub parameters: Vec<DynamicParameter>,
    pub suggested_priorities: Vec<String>,
}

impl ParameterSuggestions {
    /// Fixed preset used whenever synthesis cannot produce a usable set.
    pub fn fallback() -> Self {
        Self {
            parameters: vec![
                DynamicParameter::slider("cost", "Importance of Cost", 0.0, 100.0, 50.0)
                    .with_reason("Budget is often a key factor."),
                DynamicParameter::slider("risk", "Risk Tolerance", 0.0, 100.0, 30.0)
                    .with_reason("Helps balance safety vs innovation."),
            ],
            suggested_priorities: fallback_priorities(),
        }
    }
}

/// The fallback priority list as owned strings.
pub fn fallback_priorities() -> Vec<String> {
    FALLBACK_PRIORITIES.iter().map(|p| p.to_string()).collect()
}
