//! Repository for the `template_fields` table.

use qms_core::field::{FieldChanges, FieldFilter, NewField};
use qms_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::template_field::TemplateFieldRow;

/// Column list for template_fields queries.
const COLUMNS: &str = "id, template_id, technical_name, label, field_type, is_required, \
    iso_section, iso_clause, iso_subclause, evidence_required, sort_order, is_active, \
    options, created_at, updated_at";

/// Provides CRUD operations for template fields.
pub struct TemplateFieldRepo;

impl TemplateFieldRepo {
    /// Insert a field, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewField) -> Result<TemplateFieldRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO template_fields \
                (template_id, technical_name, label, field_type, is_required, iso_section, \
                 iso_clause, iso_subclause, evidence_required, sort_order, is_active, options) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateFieldRow>(&query)
            .bind(input.template_id)
            .bind(&input.technical_name)
            .bind(&input.label)
            .bind(input.field_type.as_str())
            .bind(input.required)
            .bind(&input.iso_section)
            .bind(&input.iso_clause)
            .bind(&input.iso_subclause)
            .bind(input.evidence_required)
            .bind(input.sort_order)
            .bind(input.active)
            .bind(Json(&input.options))
            .fetch_one(pool)
            .await
    }

    /// Find a field by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TemplateFieldRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM template_fields WHERE id = $1");
        sqlx::query_as::<_, TemplateFieldRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a template's fields in display order.
    pub async fn list(
        pool: &PgPool,
        filter: &FieldFilter,
    ) -> Result<Vec<TemplateFieldRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_fields \
             WHERE template_id = $1 \
               AND ($2::BOOLEAN IS NULL OR is_active = $2) \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, TemplateFieldRow>(&query)
            .bind(filter.template_id)
            .bind(filter.active)
            .fetch_all(pool)
            .await
    }

    /// Update a field. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &FieldChanges,
    ) -> Result<Option<TemplateFieldRow>, sqlx::Error> {
        let query = format!(
            "UPDATE template_fields SET \
                technical_name    = COALESCE($2, technical_name), \
                label             = COALESCE($3, label), \
                field_type        = COALESCE($4, field_type), \
                is_required       = COALESCE($5, is_required), \
                iso_section       = COALESCE($6, iso_section), \
                iso_clause        = COALESCE($7, iso_clause), \
                iso_subclause     = COALESCE($8, iso_subclause), \
                evidence_required = COALESCE($9, evidence_required), \
                sort_order        = COALESCE($10, sort_order), \
                is_active         = COALESCE($11, is_active), \
                options           = COALESCE($12, options), \
                updated_at        = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateFieldRow>(&query)
            .bind(id)
            .bind(&input.technical_name)
            .bind(&input.label)
            .bind(input.field_type.map(|t| t.as_str()))
            .bind(input.required)
            .bind(&input.iso_section)
            .bind(&input.iso_clause)
            .bind(&input.iso_subclause)
            .bind(input.evidence_required)
            .bind(input.sort_order)
            .bind(input.active)
            .bind(input.options.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a field. Its answers cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM template_fields WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
