//! Template field model and DTOs.
//!
//! Create/update payloads carry the field type as text and options as raw
//! JSON; [`prepare_create`] and [`prepare_update`] turn them into typed,
//! normalized values before any store sees them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field_type::{Control, FieldType};
use crate::options::{parse_options_payload, ChoiceOption};
use crate::template::require_non_blank;
use crate::types::{DbId, Timestamp};

/// Grouping tag applied when a payload does not name an ISO section.
pub const DEFAULT_ISO_SECTION: &str = "general";

/// A persisted template field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: DbId,
    pub template_id: DbId,
    pub technical_name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub iso_section: String,
    pub iso_clause: Option<String>,
    pub iso_subclause: Option<String>,
    /// Advisory only; nothing enforces attached evidence.
    pub evidence_required: bool,
    pub sort_order: i32,
    pub active: bool,
    pub options: Vec<ChoiceOption>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FieldDefinition {
    /// The control contract for this field.
    pub fn control(&self) -> Control {
        self.field_type.control(&self.options)
    }
}

fn default_true() -> bool {
    true
}

/// DTO for creating a field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateField {
    pub template_id: DbId,
    pub technical_name: String,
    pub label: String,
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    pub iso_section: Option<String>,
    pub iso_clause: Option<String>,
    pub iso_subclause: Option<String>,
    #[serde(default)]
    pub evidence_required: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
    /// JSON array, or a string containing JSON text.
    #[serde(default)]
    pub options: serde_json::Value,
}

/// DTO for updating a field. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateField {
    pub technical_name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<String>,
    pub required: Option<bool>,
    pub iso_section: Option<String>,
    pub iso_clause: Option<String>,
    pub iso_subclause: Option<String>,
    pub evidence_required: Option<bool>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
    pub options: Option<serde_json::Value>,
}

/// Validated, normalized row handed to a store for insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewField {
    pub template_id: DbId,
    pub technical_name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub iso_section: String,
    pub iso_clause: Option<String>,
    pub iso_subclause: Option<String>,
    pub evidence_required: bool,
    pub sort_order: i32,
    pub active: bool,
    pub options: Vec<ChoiceOption>,
}

/// Validated, normalized patch. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    pub technical_name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    pub iso_section: Option<String>,
    pub iso_clause: Option<String>,
    pub iso_subclause: Option<String>,
    pub evidence_required: Option<bool>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
    pub options: Option<Vec<ChoiceOption>>,
}

/// List filter for fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldFilter {
    pub template_id: DbId,
    pub active: Option<bool>,
}

impl FieldFilter {
    pub fn active_for(template_id: DbId) -> Self {
        Self {
            template_id,
            active: Some(true),
        }
    }

    pub fn matches(&self, field: &FieldDefinition) -> bool {
        field.template_id == self.template_id && self.active.is_none_or(|a| a == field.active)
    }
}

/// Validate a create payload. The owning template's existence is checked by
/// the engine, which has store access.
pub fn prepare_create(input: &CreateField) -> Result<NewField, CoreError> {
    require_non_blank("technical_name", &input.technical_name)?;
    require_non_blank("label", &input.label)?;
    let field_type: FieldType = input.field_type.parse()?;
    let options = parse_options_payload(&input.options)?;

    Ok(NewField {
        template_id: input.template_id,
        technical_name: input.technical_name.trim().to_string(),
        label: input.label.trim().to_string(),
        field_type,
        required: input.required,
        iso_section: input
            .iso_section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ISO_SECTION)
            .to_string(),
        iso_clause: input.iso_clause.clone(),
        iso_subclause: input.iso_subclause.clone(),
        evidence_required: input.evidence_required,
        sort_order: input.sort_order,
        active: input.active,
        options,
    })
}

/// Validate an update payload with the same rules as create, applied only to
/// the values that are present.
pub fn prepare_update(input: &UpdateField) -> Result<FieldChanges, CoreError> {
    if let Some(name) = &input.technical_name {
        require_non_blank("technical_name", name)?;
    }
    if let Some(label) = &input.label {
        require_non_blank("label", label)?;
    }
    if let Some(section) = &input.iso_section {
        require_non_blank("iso_section", section)?;
    }
    let field_type = input
        .field_type
        .as_deref()
        .map(str::parse::<FieldType>)
        .transpose()?;
    let options = input
        .options
        .as_ref()
        .map(parse_options_payload)
        .transpose()?;

    Ok(FieldChanges {
        technical_name: input.technical_name.as_deref().map(|s| s.trim().to_string()),
        label: input.label.as_deref().map(|s| s.trim().to_string()),
        field_type,
        required: input.required,
        iso_section: input.iso_section.as_deref().map(|s| s.trim().to_string()),
        iso_clause: input.iso_clause.clone(),
        iso_subclause: input.iso_subclause.clone(),
        evidence_required: input.evidence_required,
        sort_order: input.sort_order,
        active: input.active,
        options,
    })
}

/// Apply a patch in place. Used by stores that keep rows in memory.
pub fn apply_changes(field: &mut FieldDefinition, changes: &FieldChanges) {
    if let Some(v) = &changes.technical_name {
        field.technical_name = v.clone();
    }
    if let Some(v) = &changes.label {
        field.label = v.clone();
    }
    if let Some(v) = changes.field_type {
        field.field_type = v;
    }
    if let Some(v) = changes.required {
        field.required = v;
    }
    if let Some(v) = &changes.iso_section {
        field.iso_section = v.clone();
    }
    if let Some(v) = &changes.iso_clause {
        field.iso_clause = Some(v.clone());
    }
    if let Some(v) = &changes.iso_subclause {
        field.iso_subclause = Some(v.clone());
    }
    if let Some(v) = changes.evidence_required {
        field.evidence_required = v;
    }
    if let Some(v) = changes.sort_order {
        field.sort_order = v;
    }
    if let Some(v) = changes.active {
        field.active = v;
    }
    if let Some(v) = &changes.options {
        field.options = v.clone();
    }
}
