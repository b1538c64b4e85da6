//! Row model for `form_templates`.

use qms_core::error::CoreError;
use qms_core::template::Template;
use qms_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `form_templates` table.
#[derive(Debug, Clone, FromRow)]
pub struct FormTemplateRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub module: String,
    pub entity_type: String,
    pub process_id: Option<DbId>,
    pub version: i32,
    pub workflow_state: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<FormTemplateRow> for Template {
    type Error = CoreError;

    fn try_from(row: FormTemplateRow) -> Result<Self, Self::Error> {
        Ok(Template {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            module: row.module,
            entity_type: row.entity_type,
            process_id: row.process_id,
            version: row.version,
            workflow_state: row.workflow_state.parse()?,
            active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
