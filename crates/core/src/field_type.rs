//! Field types and the per-type control contract.
//!
//! A [`FieldType`] is the closed tag stored on every template field. The
//! [`Control`] derived from it (plus the field's normalized options) owns all
//! type-dependent behavior: how a value is rendered, validated, serialized to
//! its canonical stored string and read back.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::options::ChoiceOption;

/// Canonical date format for stored answers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// All valid field type tags, in display order.
pub const VALID_FIELD_TYPES: &[&str] = &[
    "text", "textarea", "number", "date", "boolean", "select", "radio", "checkbox",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Boolean,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Whether this type renders an enumerated choice when options exist.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }

    /// Build the control contract for a field of this type.
    ///
    /// Choice types with an empty option list, like every other type without
    /// a dedicated control, fall back to a single-line free-text input.
    pub fn control(self, options: &[ChoiceOption]) -> Control {
        match self {
            FieldType::Textarea => Control::MultiLineText,
            FieldType::Date => Control::Date,
            FieldType::Number => Control::Number,
            FieldType::Boolean => Control::TriState,
            FieldType::Select if !options.is_empty() => Control::Choice {
                style: ChoiceStyle::Dropdown,
                options: options.to_vec(),
            },
            FieldType::Radio if !options.is_empty() => Control::Choice {
                style: ChoiceStyle::Radio,
                options: options.to_vec(),
            },
            FieldType::Checkbox if !options.is_empty() => Control::Choice {
                style: ChoiceStyle::Checkbox,
                options: options.to_vec(),
            },
            _ => Control::SingleLineText,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "textarea" => Ok(FieldType::Textarea),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "boolean" => Ok(FieldType::Boolean),
            "select" => Ok(FieldType::Select),
            "radio" => Ok(FieldType::Radio),
            "checkbox" => Ok(FieldType::Checkbox),
            other => Err(CoreError::Validation(format!(
                "Invalid field_type '{other}'. Must be one of: {}",
                VALID_FIELD_TYPES.join(", ")
            ))),
        }
    }
}

/// How a choice control is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceStyle {
    Dropdown,
    Radio,
    Checkbox,
}

/// The input contract a renderer must honor for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    SingleLineText,
    MultiLineText,
    /// ISO `YYYY-MM-DD`.
    Date,
    /// Numeric text.
    Number,
    /// One of `""`, `"true"`, `"false"`.
    TriState,
    Choice {
        style: ChoiceStyle,
        options: Vec<ChoiceOption>,
    },
}

/// A stored answer read back through its control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
    Choice(ChoiceOption),
}

impl Control {
    /// Check a submitted (already canonical) value against this control.
    ///
    /// Blank values always pass; requiredness is checked separately.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        match self {
            Control::SingleLineText | Control::MultiLineText => Ok(()),
            Control::Number => match value.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(()),
                _ => Err(format!("'{value}' is not a number")),
            },
            Control::Date => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(|_| ())
                .map_err(|_| format!("'{value}' is not a date (expected YYYY-MM-DD)")),
            Control::TriState => match value {
                "true" | "false" => Ok(()),
                _ => Err(format!("'{value}' must be 'true', 'false' or empty")),
            },
            Control::Choice { options, .. } => {
                if options.iter().any(|o| o.value == value) {
                    Ok(())
                } else {
                    let allowed: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                    Err(format!(
                        "'{value}' is not one of: {}",
                        allowed.join(", ")
                    ))
                }
            }
        }
    }

    /// Turn a submitted JSON scalar into the canonical stored string.
    pub fn serialize(&self, raw: &serde_json::Value) -> Result<String, String> {
        let text = match raw {
            serde_json::Value::Null => String::new(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            _ => return Err("expected a scalar value".to_string()),
        };
        Ok(match self {
            Control::SingleLineText | Control::MultiLineText => text,
            _ => text.trim().to_string(),
        })
    }

    /// Read a stored string back into a typed value.
    ///
    /// Values that no longer fit the control (e.g. the field type changed after
    /// answers were saved) come back as plain text rather than failing.
    pub fn deserialize(&self, stored: &str) -> AnswerValue {
        if stored.trim().is_empty() {
            return AnswerValue::Empty;
        }
        let fallback = || AnswerValue::Text(stored.to_string());
        match self {
            Control::SingleLineText | Control::MultiLineText => fallback(),
            Control::Number => stored
                .trim()
                .parse::<f64>()
                .map(AnswerValue::Number)
                .unwrap_or_else(|_| fallback()),
            Control::Date => NaiveDate::parse_from_str(stored.trim(), DATE_FORMAT)
                .map(AnswerValue::Date)
                .unwrap_or_else(|_| fallback()),
            Control::TriState => match stored.trim() {
                "true" => AnswerValue::Bool(true),
                "false" => AnswerValue::Bool(false),
                _ => fallback(),
            },
            Control::Choice { options, .. } => options
                .iter()
                .find(|o| o.value == stored)
                .cloned()
                .map(AnswerValue::Choice)
                .unwrap_or_else(fallback),
        }
    }
}
