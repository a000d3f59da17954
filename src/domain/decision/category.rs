//! Decision categories offered at setup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad area a dilemma belongs to. Steers parameter synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecisionCategory {
    Technology,
    Business,
    Career,
    Finance,
    Education,
    Health,
    Lifestyle,
    #[default]
    #[serde(other)]
    Other,
}

impl DecisionCategory {
    /// All categories in presentation order.
    pub fn all() -> &'static [DecisionCategory] {
        &[
            DecisionCategory::Technology,
            DecisionCategory::Business,
            DecisionCategory::Career,
            DecisionCategory::Finance,
            DecisionCategory::Education,
            DecisionCategory::Health,
            DecisionCategory::Lifestyle,
            DecisionCategory::Other,
        ]
    }

    /// Human-readable name used in prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            DecisionCategory::Technology => "Technology",
            DecisionCategory::Business => "Business",
            DecisionCategory::Career => "Career",
            DecisionCategory::Finance => "Finance",
            DecisionCategory::Education => "Education",
            DecisionCategory::Health => "Health",
            DecisionCategory::Lifestyle => "Lifestyle",
            DecisionCategory::Other => "Other",
        }
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
