//! Comparison results and their normalization from provider output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Score used for any metric the provider omitted.
pub const DEFAULT_SCORE: u8 = 50;

pub const FALLBACK_OPTION_NAME: &str = "Option";
pub const FALLBACK_OVERVIEW: &str = "Path analyzed based on your requirements.";
pub const FALLBACK_SUMMARY: &str = "The Referee has analyzed your options.";
pub const FALLBACK_RECOMMENDATION: &str = "Consider the trade-offs above to make your choice.";

/// Trade-off dimensions every option is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Suitability,
    Risk,
    Cost,
    Scalability,
}

impl Metric {
    /// Metrics in matrix order.
    pub fn all() -> &'static [Metric] {
        &[
            Metric::Suitability,
            Metric::Risk,
            Metric::Cost,
            Metric::Scalability,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Suitability => "suitability",
            Metric::Risk => "risk",
            Metric::Cost => "cost",
            Metric::Scalability => "scalability",
        }
    }
}

/// Per-option scores, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub suitability: u8,
    pub risk: u8,
    pub cost: u8,
    pub scalability: u8,
}

impl Default for Scores {
    fn default() -> Self {
        Self {
            suitability: DEFAULT_SCORE,
            risk: DEFAULT_SCORE,
            cost: DEFAULT_SCORE,
            scalability: DEFAULT_SCORE,
        }
    }
}

impl Scores {
    /// Returns the score for a metric.
    pub fn get(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Suitability => self.suitability,
            Metric::Risk => self.risk,
            Metric::Cost => self.cost,
            Metric::Scalability => self.scalability,
        }
    }

    /// Reads scores leniently; missing or non-numeric entries score 50.
    fn from_json(value: Option<&Value>) -> Self {
        let Some(obj) = value.and_then(Value::as_object) else {
            return Self::default();
        };
        let score = |metric: Metric| {
            obj.get(metric.as_str())
                .and_then(score_like)
                .unwrap_or(DEFAULT_SCORE)
        };

        Self {
            suitability: score(Metric::Suitability),
            risk: score(Metric::Risk),
            cost: score(Metric::Cost),
            scalability: score(Metric::Scalability),
        }
    }
}

/// One candidate path through the dilemma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOption {
    pub name: String,
    pub overview: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub best_for: String,
    pub risks: Vec<String>,
    pub cost_level: String,
    pub complexity: String,
    pub scores: Scores,
}

impl ComparisonOption {
    /// Normalizes a provider entry, filling every missing field.
    ///
    /// Returns `None` when the entry is not an object.
    fn from_json(entry: &Value) -> Option<Self> {
        let obj = entry.as_object()?;
        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        let list = |key: &str| -> Vec<String> {
            obj.get(key)
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        };

        Some(Self {
            name: or_fallback(text("name"), FALLBACK_OPTION_NAME),
            overview: or_fallback(text("overview"), FALLBACK_OVERVIEW),
            pros: list("pros"),
            cons: list("cons"),
            best_for: text("best_for"),
            risks: list("risks"),
            cost_level: text("cost_level"),
            complexity: text("complexity"),
            scores: Scores::from_json(obj.get("scores")),
        })
    }
}

/// A complete analysis. Never patched: each run produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub options: Vec<ComparisonOption>,
    pub summary: String,
    pub recommendation: String,
    pub generated_at: DateTime<Utc>,
}

/// One row of the trade-off matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: Metric,
    pub scores: Vec<OptionScore>,
}

/// An option's score on one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionScore {
    pub option: String,
    pub score: u8,
}

impl ComparisonResponse {
    /// Builds a response from extracted provider output.
    ///
    /// Never fails: anything missing is defaulted field by field, and a
    /// payload that is not an object yields no options with fallback text.
    pub fn from_extracted(data: &Value) -> Self {
        let options = data
            .get("options")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(ComparisonOption::from_json).collect())
            .unwrap_or_default();
        let text = |key: &str, fallback: &str| {
            or_fallback(
                data.get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
                fallback,
            )
        };

        Self {
            options,
            summary: text("summary", FALLBACK_SUMMARY),
            recommendation: text("recommendation", FALLBACK_RECOMMENDATION),
            generated_at: Utc::now(),
        }
    }

    /// Scores grouped by metric, options in their original order.
    pub fn tradeoff_matrix(&self) -> Vec<MetricRow> {
        Metric::all()
            .iter()
            .map(|metric| MetricRow {
                metric: *metric,
                scores: self
                    .options
                    .iter()
                    .map(|opt| OptionScore {
                        option: opt.name.clone(),
                        score: opt.scores.get(*metric),
                    })
                    .collect(),
            })
            .collect()
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn score_like(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_without_scores_gets_all_fifty() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [{"name": "Monolith", "overview": "Keep it simple"}],
            "summary": "s", "recommendation": "r"
        }));
        assert_eq!(
            response.options[0].scores,
            Scores { suitability: 50, risk: 50, cost: 50, scalability: 50 }
        );
    }

    #[test]
    fn option_without_name_is_called_option() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [{"overview": "Something"}]
        }));
        assert_eq!(response.options[0].name, "Option");
    }

    #[test]
    fn option_without_overview_gets_generic_sentence() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [{"name": "A"}]
        }));
        assert_eq!(response.options[0].overview, FALLBACK_OVERVIEW);
    }

    #[test]
    fn partial_scores_fill_missing_metrics() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [{"name": "A", "scores": {"suitability": 90, "risk": "20"}}]
        }));
        let scores = response.options[0].scores;
        assert_eq!(scores.suitability, 90);
        assert_eq!(scores.risk, 20);
        assert_eq!(scores.cost, 50);
        assert_eq!(scores.scalability, 50);
    }

    #[test]
    fn scores_are_rounded_and_clamped() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [{"scores": {"suitability": 140, "risk": -3, "cost": 72.6, "scalability": "88%"}}]
        }));
        let scores = response.options[0].scores;
        assert_eq!(scores.suitability, 100);
        assert_eq!(scores.risk, 0);
        assert_eq!(scores.cost, 73);
        assert_eq!(scores.scalability, 88);
    }

    #[test]
    fn missing_top_level_text_uses_fallbacks() {
        let response = ComparisonResponse::from_extracted(&json!({}));
        assert!(response.options.is_empty());
        assert_eq!(response.summary, FALLBACK_SUMMARY);
        assert_eq!(response.recommendation, FALLBACK_RECOMMENDATION);
    }

    #[test]
    fn non_object_options_are_skipped() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": ["nope", {"name": "Real"}, 3]
        }));
        assert_eq!(response.options.len(), 1);
        assert_eq!(response.options[0].name, "Real");
    }

    #[test]
    fn narrative_fields_are_carried_over() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [{
                "name": "Buy", "overview": "Use a vendor",
                "pros": ["fast", ""], "cons": ["lock-in"], "best_for": "small teams",
                "risks": ["price hikes"], "cost_level": "High", "complexity": "Low",
                "scores": {"suitability": 70, "risk": 40, "cost": 80, "scalability": 60}
            }],
            "summary": "Buying wins", "recommendation": "Buy it"
        }));
        let opt = &response.options[0];
        assert_eq!(opt.pros, vec!["fast"]);
        assert_eq!(opt.cons, vec!["lock-in"]);
        assert_eq!(opt.best_for, "small teams");
        assert_eq!(opt.cost_level, "High");
        assert_eq!(response.summary, "Buying wins");
        assert_eq!(response.recommendation, "Buy it");
    }

    #[test]
    fn tradeoff_matrix_groups_scores_by_metric() {
        let response = ComparisonResponse::from_extracted(&json!({
            "options": [
                {"name": "A", "scores": {"suitability": 10, "risk": 20, "cost": 30, "scalability": 40}},
                {"name": "B"}
            ]
        }));
        let matrix = response.tradeoff_matrix();

        assert_eq!(matrix.len(), 4);
        assert_eq!(matrix[1].metric, Metric::Risk);
        assert_eq!(
            matrix[1].scores,
            vec![
                OptionScore { option: "A".to_string(), score: 20 },
                OptionScore { option: "B".to_string(), score: 50 },
            ]
        );
    }
}
