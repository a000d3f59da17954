//! Response schemas sent with provider requests.
//!
//! Written in the provider's OpenAPI subset (upper-case type names).

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Schema for synthesized parameters and priority suggestions.
pub static PARAMETER_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "parameters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {"type": "STRING"},
                        "name": {"type": "STRING"},
                        "label": {"type": "STRING"},
                        "type": {"type": "STRING", "enum": ["slider", "toggle", "select"]},
                        "min": {"type": "NUMBER"},
                        "max": {"type": "NUMBER"},
                        "unit": {"type": "STRING"},
                        "options": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "reason": {"type": "STRING"},
                        "defaultValue": {"type": "STRING"}
                    },
                    "required": ["id", "name", "label", "type", "reason"]
                }
            },
            "suggestedPriorities": {
                "type": "ARRAY",
                "items": {"type": "STRING"}
            }
        },
        "required": ["parameters", "suggestedPriorities"]
    })
});

/// Schema for a scored comparison.
pub static COMPARISON_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    json!({
        "type": "OBJECT",
        "properties": {
            "options": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING"},
                        "overview": {"type": "STRING"},
                        "pros": string_list,
                        "cons": string_list,
                        "best_for": {"type": "STRING"},
                        "risks": string_list,
                        "cost_level": {"type": "STRING"},
                        "complexity": {"type": "STRING"},
                        "scores": {
                            "type": "OBJECT",
                            "properties": {
                                "suitability": {"type": "INTEGER"},
                                "risk": {"type": "INTEGER"},
                                "cost": {"type": "INTEGER"},
                                "scalability": {"type": "INTEGER"}
                            },
                            "required": ["suitability", "risk", "cost", "scalability"]
                        }
                    },
                    "required": [
                        "name", "overview", "pros", "cons", "best_for",
                        "risks", "cost_level", "complexity", "scores"
                    ]
                }
            },
            "summary": {"type": "STRING"},
            "recommendation": {"type": "STRING"}
        },
        "required": ["options", "summary", "recommendation"]
    })
});
