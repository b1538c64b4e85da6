//! Row model for `field_answers`.

use qms_core::answer::FieldAnswer;
use qms_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `field_answers` table.
#[derive(Debug, Clone, FromRow)]
pub struct FieldAnswerRow {
    pub id: DbId,
    pub template_field_id: DbId,
    pub entity_id: DbId,
    pub value: String,
    pub last_saved_at: Timestamp,
}

impl From<FieldAnswerRow> for FieldAnswer {
    fn from(row: FieldAnswerRow) -> Self {
        FieldAnswer {
            id: row.id,
            template_field_id: row.template_field_id,
            entity_id: row.entity_id,
            value: row.value,
            last_saved_at: row.last_saved_at,
        }
    }
}
