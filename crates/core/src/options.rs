//! Choice options for `select` / `radio` / `checkbox` fields.
//!
//! Options arrive untyped (a JSON array, or a string holding JSON text typed
//! into the template editor). They are normalized here into a list of
//! [`ChoiceOption`] and untyped JSON never travels further than this module.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One entry of an options payload before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    /// A bare string; it is both the label and the stored value.
    Plain(String),
    /// An explicit `{ "label": ..., "value": ... }` record.
    LabelValue { label: String, value: String },
}

/// A normalized option: what the user sees and what gets stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<RawOption> for ChoiceOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(s) => ChoiceOption {
                label: s.clone(),
                value: s,
            },
            RawOption::LabelValue { label, value } => ChoiceOption { label, value },
        }
    }
}

/// Normalize an already-parsed options value.
///
/// Anything that is not an array yields an empty list. Array elements that are
/// neither a string nor a `{label, value}` record of strings are dropped.
pub fn normalize_options(raw: &serde_json::Value) -> Vec<ChoiceOption> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<RawOption>(item.clone()).ok())
        .map(ChoiceOption::from)
        .collect()
}

/// Parse an options payload at the storage boundary.
///
/// A JSON string is treated as raw JSON text and must parse; a parse failure
/// is a validation error and nothing is stored. `null` means "no options".
pub fn parse_options_payload(payload: &serde_json::Value) -> Result<Vec<ChoiceOption>, CoreError> {
    match payload {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(text) => {
            if text.trim().is_empty() {
                return Ok(Vec::new());
            }
            let parsed: serde_json::Value = serde_json::from_str(text).map_err(|e| {
                CoreError::Validation(format!("options is not valid JSON: {e}"))
            })?;
            Ok(normalize_options(&parsed))
        }
        other => Ok(normalize_options(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn bare_strings_become_label_value_pairs() {
        let options = normalize_options(&json!(["Sí", "No"]));
        assert_eq!(
            options,
            vec![ChoiceOption::new("Sí", "Sí"), ChoiceOption::new("No", "No")]
        );
    }

    #[test]
    fn label_value_records_are_kept_unchanged() {
        let options = normalize_options(&json!([{ "label": "Cumple", "value": "cumple" }]));
        assert_eq!(options, vec![ChoiceOption::new("Cumple", "cumple")]);
    }

    #[test]
    fn non_array_normalizes_to_empty() {
        assert!(normalize_options(&json!({ "label": "x", "value": "y" })).is_empty());
        assert!(normalize_options(&json!("Sí")).is_empty());
        assert!(normalize_options(&json!(42)).is_empty());
    }

    #[test]
    fn unrecognized_elements_are_dropped() {
        let options = normalize_options(&json!(["a", 7, { "label": "B" }, { "label": "C", "value": "c" }]));
        assert_eq!(
            options,
            vec![ChoiceOption::new("a", "a"), ChoiceOption::new("C", "c")]
        );
    }

    #[test]
    fn raw_json_text_is_parsed() {
        let options = parse_options_payload(&json!(r#"["conforme","no_conforme"]"#)).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].value, "no_conforme");
    }

    #[test]
    fn malformed_json_text_is_rejected() {
        let result = parse_options_payload(&json!(r#"["conforme", "#));
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("options is not valid JSON"));
    }

    #[test]
    fn null_and_blank_mean_no_options() {
        assert!(parse_options_payload(&serde_json::Value::Null).unwrap().is_empty());
        assert!(parse_options_payload(&json!("  ")).unwrap().is_empty());
    }
}
