//! Row model for `template_fields`.

use qms_core::error::CoreError;
use qms_core::field::FieldDefinition;
use qms_core::options::ChoiceOption;
use qms_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `template_fields` table. Options are stored already
/// normalized as a JSONB array of `{label, value}`.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateFieldRow {
    pub id: DbId,
    pub template_id: DbId,
    pub technical_name: String,
    pub label: String,
    pub field_type: String,
    pub is_required: bool,
    pub iso_section: String,
    pub iso_clause: Option<String>,
    pub iso_subclause: Option<String>,
    pub evidence_required: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub options: Json<Vec<ChoiceOption>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TemplateFieldRow> for FieldDefinition {
    type Error = CoreError;

    fn try_from(row: TemplateFieldRow) -> Result<Self, Self::Error> {
        let field_type = row
            .field_type
            .parse()
            .map_err(|_| CoreError::Internal(format!("Unknown stored field_type '{}'", row.field_type)))?;

        Ok(FieldDefinition {
            id: row.id,
            template_id: row.template_id,
            technical_name: row.technical_name,
            label: row.label,
            field_type,
            required: row.is_required,
            iso_section: row.iso_section,
            iso_clause: row.iso_clause,
            iso_subclause: row.iso_subclause,
            evidence_required: row.evidence_required,
            sort_order: row.sort_order,
            active: row.is_active,
            options: row.options.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
