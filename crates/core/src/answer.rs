//! Field answers and the validation half of batched saves.
//!
//! Saving a batch has two phases with different atomicity. Validation is
//! all-or-nothing and runs here, without store access. Persistence is
//! best-effort per entry and lives in the engine.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::field::FieldDefinition;
use crate::field_type::Control;
use crate::types::{DbId, Timestamp};

/// One stored response to one field for one execution entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAnswer {
    pub id: DbId,
    pub template_field_id: DbId,
    pub entity_id: DbId,
    /// Canonical string form of the value.
    pub value: String,
    pub last_saved_at: Timestamp,
}

/// One submitted value.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerEntry {
    pub template_field_id: DbId,
    /// A JSON scalar; canonicalized by the field's control.
    #[serde(default)]
    pub value: serde_json::Value,
    /// When present, this row is updated directly.
    pub answer_id: Option<DbId>,
}

/// Request body for a batched save.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAnswers {
    pub entity_id: DbId,
    pub template_id: DbId,
    pub entries: Vec<AnswerEntry>,
}

/// An entry that passed validation, with its canonical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEntry {
    pub template_field_id: DbId,
    pub value: String,
    pub answer_id: Option<DbId>,
}

/// A submitted value its field's control refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidValue {
    pub template_field_id: DbId,
    pub technical_name: String,
    pub reason: String,
}

/// Why a batch was refused before anything was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub reason: String,
    pub missing_fields: Vec<String>,
    pub invalid_values: Vec<InvalidValue>,
}

/// An entry whose write failed during the persistence phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    pub template_field_id: DbId,
    pub reason: String,
}

/// Aggregate result of the persistence phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub answers: Vec<FieldAnswer>,
    pub failures: Vec<EntryFailure>,
}

impl BatchReport {
    /// Every entry was written.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Terminal outcome of a batched save. A partial write is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Rejected(Rejection),
    PartiallyPersisted(BatchReport),
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Validate a batch against the template's active fields.
///
/// Every required field must receive a non-blank value (after trimming), and
/// every non-blank value must satisfy its field's control. Entries for ids
/// outside `fields` are canonicalized as free text and left to the store.
/// When several entries target the same field, the last one counts.
pub fn validate_batch(
    fields: &[FieldDefinition],
    entries: &[AnswerEntry],
) -> Result<Vec<PreparedEntry>, Rejection> {
    let by_id: HashMap<DbId, &FieldDefinition> = fields.iter().map(|f| (f.id, f)).collect();

    let mut prepared = Vec::with_capacity(entries.len());
    let mut invalid_values = Vec::new();

    for entry in entries {
        let field = by_id.get(&entry.template_field_id);
        let control = field.map_or(Control::SingleLineText, |f| f.control());
        let technical_name = field.map_or_else(
            || format!("#{}", entry.template_field_id),
            |f| f.technical_name.clone(),
        );

        let checked = control
            .serialize(&entry.value)
            .and_then(|value| control.validate(&value).map(|()| value));

        match checked {
            Ok(value) => prepared.push(PreparedEntry {
                template_field_id: entry.template_field_id,
                value,
                answer_id: entry.answer_id,
            }),
            Err(reason) => invalid_values.push(InvalidValue {
                template_field_id: entry.template_field_id,
                technical_name,
                reason,
            }),
        }
    }

    let submitted: HashMap<DbId, &str> = prepared
        .iter()
        .map(|p| (p.template_field_id, p.value.as_str()))
        .collect();

    // A required field whose value was refused is reported as invalid only.
    let refused: HashSet<DbId> = invalid_values.iter().map(|v| v.template_field_id).collect();

    let missing_fields: Vec<String> = fields
        .iter()
        .filter(|f| f.required && !refused.contains(&f.id))
        .filter(|f| {
            submitted
                .get(&f.id)
                .is_none_or(|value| value.trim().is_empty())
        })
        .map(|f| f.technical_name.clone())
        .collect();

    if missing_fields.is_empty() && invalid_values.is_empty() {
        return Ok(prepared);
    }

    let mut parts = Vec::new();
    if !missing_fields.is_empty() {
        parts.push(format!(
            "{}: {}",
            plural(
                missing_fields.len(),
                "missing required field",
                "missing required fields"
            ),
            missing_fields.join(", ")
        ));
    }
    if !invalid_values.is_empty() {
        let details: Vec<String> = invalid_values
            .iter()
            .map(|v| format!("{} ({})", v.technical_name, v.reason))
            .collect();
        parts.push(format!(
            "{}: {}",
            plural(invalid_values.len(), "invalid value", "invalid values"),
            details.join(", ")
        ));
    }

    Err(Rejection {
        reason: parts.join("; "),
        missing_fields,
        invalid_values,
    })
}
