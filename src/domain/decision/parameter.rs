//! Dynamic decision parameters.
//!
//! Parameters are proposed per session by the model, so their shape arrives
//! as loosely-typed JSON. [`RawParameter`] captures that shape leniently and
//! [`RawParameter::resolve`] turns it into a [`DynamicParameter`] whose value
//! is carried by a kind-discriminated [`ParameterControl`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Range used for sliders the provider left unbounded.
pub const DEFAULT_SLIDER_MIN: f64 = 0.0;
pub const DEFAULT_SLIDER_MAX: f64 = 100.0;

/// A user-tunable input whose existence and range are decided per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicParameter {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(flatten)]
    pub control: ParameterControl,
}

/// The control behind a parameter, tagged by kind.
///
/// Serialized with a `type` tag next to the parameter's other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterControl {
    /// Numeric value within `[min, max]`.
    Slider { min: f64, max: f64, value: f64 },
    /// On/off switch.
    Toggle { value: bool },
    /// One of a fixed list of options.
    Select { options: Vec<String>, value: String },
    /// Free text the provider proposed under an unknown kind. Read-only.
    Text { value: String },
}

/// Discriminant of [`ParameterControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Slider,
    Toggle,
    Select,
    Text,
}

impl ParameterKind {
    /// Parses the provider's `type` string. Anything unrecognised is free text.
    pub fn from_provider(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "slider" => ParameterKind::Slider,
            "toggle" => ParameterKind::Toggle,
            "select" => ParameterKind::Select,
            _ => ParameterKind::Text,
        }
    }

    fn value_type(&self) -> &'static str {
        match self {
            ParameterKind::Slider => "number",
            ParameterKind::Toggle => "boolean",
            ParameterKind::Select | ParameterKind::Text => "string",
        }
    }
}

/// A parameter value as submitted by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Flag(b) => write!(f, "{}", b),
            ParameterValue::Number(n) => write!(f, "{}", format_number(*n)),
            ParameterValue::Text(s) => f.write_str(s),
        }
    }
}

/// Formats whole numbers without a fractional part (`50`, not `50.0`).
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl DynamicParameter {
    /// Creates a slider parameter. The value is clamped into the range.
    pub fn slider(
        id: impl Into<String>,
        label: impl Into<String>,
        min: f64,
        max: f64,
        value: f64,
    ) -> Self {
        let id = id.into();
        let (min, max) = ordered_range(min, max);
        Self {
            name: id.clone(),
            id,
            label: label.into(),
            unit: None,
            reason: String::new(),
            control: ParameterControl::Slider {
                min,
                max,
                value: clamp_or_midpoint(value, min, max),
            },
        }
    }

    /// Creates a toggle parameter.
    pub fn toggle(id: impl Into<String>, label: impl Into<String>, value: bool) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            label: label.into(),
            unit: None,
            reason: String::new(),
            control: ParameterControl::Toggle { value },
        }
    }

    /// Creates a select parameter. A value outside the options falls back to the first option.
    pub fn select(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<String>,
        value: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let value = settle_selection(&options, value.into());
        Self {
            name: id.clone(),
            id,
            label: label.into(),
            unit: None,
            reason: String::new(),
            control: ParameterControl::Select { options, value },
        }
    }

    /// Sets the unit shown next to the value.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the reason the parameter matters.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Returns the parameter's kind.
    pub fn kind(&self) -> ParameterKind {
        match self.control {
            ParameterControl::Slider { .. } => ParameterKind::Slider,
            ParameterControl::Toggle { .. } => ParameterKind::Toggle,
            ParameterControl::Select { .. } => ParameterKind::Select,
            ParameterControl::Text { .. } => ParameterKind::Text,
        }
    }

    /// Returns the current value.
    pub fn value(&self) -> ParameterValue {
        match &self.control {
            ParameterControl::Slider { value, .. } => ParameterValue::Number(*value),
            ParameterControl::Toggle { value } => ParameterValue::Flag(*value),
            ParameterControl::Select { value, .. } | ParameterControl::Text { value } => {
                ParameterValue::Text(value.clone())
            }
        }
    }

    /// Returns a copy carrying `value`, leaving `self` untouched.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if the value's type does not match the kind
    /// - `OutOfRange` if a slider value falls outside `[min, max]`
    /// - `InvalidFormat` if a select value is not one of the options,
    ///   or the parameter is read-only text
    pub fn with_value(&self, value: ParameterValue) -> Result<Self, ValidationError> {
        let control = match (&self.control, value) {
            (ParameterControl::Slider { min, max, .. }, ParameterValue::Number(n)) => {
                if !n.is_finite() || n < *min || n > *max {
                    return Err(ValidationError::out_of_range(&self.id, *min, *max, n));
                }
                ParameterControl::Slider {
                    min: *min,
                    max: *max,
                    value: n,
                }
            }
            (ParameterControl::Toggle { .. }, ParameterValue::Flag(b)) => {
                ParameterControl::Toggle { value: b }
            }
            (ParameterControl::Select { options, .. }, ParameterValue::Text(s)) => {
                if !options.is_empty() && !options.contains(&s) {
                    return Err(ValidationError::invalid_format(
                        &self.id,
                        format!("'{}' is not one of the available options", s),
                    ));
                }
                ParameterControl::Select {
                    options: options.clone(),
                    value: s,
                }
            }
            (ParameterControl::Text { .. }, _) => {
                return Err(ValidationError::invalid_format(
                    &self.id,
                    "parameter is read-only",
                ));
            }
            _ => {
                return Err(ValidationError::type_mismatch(
                    &self.id,
                    self.kind().value_type(),
                ));
            }
        };

        Ok(Self {
            control,
            ..self.clone()
        })
    }

    /// Renders the parameter as a constraint line for a prompt.
    pub fn prompt_line(&self) -> String {
        let line = format!(
            "- {}: {} {}",
            self.label,
            self.value(),
            self.unit.as_deref().unwrap_or("")
        );
        line.trim_end().to_string()
    }
}

/// A parameter exactly as the provider proposed it.
///
/// Every field is optional and loosely typed; numbers may arrive as strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub kind: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<String>,
    pub options: Vec<String>,
    pub reason: Option<String>,
    pub default_value: Option<Value>,
}

impl RawParameter {
    /// Reads a raw parameter out of an extracted JSON entry.
    ///
    /// Returns `None` when the entry is not an object.
    pub fn from_json(entry: &Value) -> Option<Self> {
        let obj = entry.as_object()?;

        Some(Self {
            id: non_empty_str(obj.get("id")),
            name: non_empty_str(obj.get("name")),
            label: non_empty_str(obj.get("label")),
            kind: non_empty_str(obj.get("type")),
            min: obj.get("min").and_then(number_like),
            max: obj.get("max").and_then(number_like),
            unit: non_empty_str(obj.get("unit")),
            options: obj
                .get("options")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(scalar_to_string)
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            reason: non_empty_str(obj.get("reason")),
            default_value: obj.get("defaultValue").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// Validates and defaults the raw fields into a typed parameter.
    ///
    /// `index` is the entry's position, used to name parameters the provider
    /// left anonymous.
    ///
    /// - slider: explicit numeric default, else midpoint of `[min, max]`
    /// - toggle: always `false`; provider defaults are ignored
    /// - select / other: explicit default string, else empty
    pub fn resolve(self, index: usize) -> DynamicParameter {
        let id = self
            .id
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("param-{}", index + 1));
        let name = self.name.unwrap_or_else(|| id.clone());
        let label = self.label.unwrap_or_else(|| name.clone());
        let kind = self
            .kind
            .as_deref()
            .map(ParameterKind::from_provider)
            .unwrap_or(ParameterKind::Text);

        let control = match kind {
            ParameterKind::Slider => {
                let (min, max) = ordered_range(
                    self.min.unwrap_or(DEFAULT_SLIDER_MIN),
                    self.max.unwrap_or(DEFAULT_SLIDER_MAX),
                );
                let value = self
                    .default_value
                    .as_ref()
                    .and_then(number_like)
                    .unwrap_or((min + max) / 2.0);
                ParameterControl::Slider {
                    min,
                    max,
                    value: clamp_or_midpoint(value, min, max),
                }
            }
            ParameterKind::Toggle => ParameterControl::Toggle { value: false },
            ParameterKind::Select => {
                let value = self
                    .default_value
                    .as_ref()
                    .and_then(scalar_to_string)
                    .unwrap_or_default();
                let value = settle_selection(&self.options, value);
                ParameterControl::Select {
                    options: self.options,
                    value,
                }
            }
            ParameterKind::Text => ParameterControl::Text {
                value: self
                    .default_value
                    .as_ref()
                    .and_then(scalar_to_string)
                    .unwrap_or_default(),
            },
        };

        DynamicParameter {
            id,
            name,
            label,
            unit: self.unit,
            reason: self.reason.unwrap_or_default(),
            control,
        }
    }
}

fn ordered_range(min: f64, max: f64) -> (f64, f64) {
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

fn clamp_or_midpoint(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        (min + max) / 2.0
    }
}

fn settle_selection(options: &[String], value: String) -> String {
    match options.first() {
        Some(first) if !options.contains(&value) => first.clone(),
        _ => value,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
