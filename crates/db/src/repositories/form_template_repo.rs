//! Repository for the `form_templates` table.

use qms_core::template::{NewTemplate, TemplateFilter, UpdateTemplate};
use qms_core::types::DbId;
use sqlx::PgPool;

use crate::models::form_template::FormTemplateRow;

/// Column list for form_templates queries.
const COLUMNS: &str = "id, code, name, description, module, entity_type, process_id, \
     version, workflow_state, is_active, created_at, updated_at";

/// Provides CRUD and workflow operations for form templates.
pub struct FormTemplateRepo;

impl FormTemplateRepo {
    /// Insert a template row, returning it.
    pub async fn create(
        pool: &PgPool,
        input: &NewTemplate,
    ) -> Result<FormTemplateRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_templates \
                (code, name, description, module, entity_type, process_id, \
                 version, workflow_state, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormTemplateRow>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.module)
            .bind(&input.entity_type)
            .bind(input.process_id)
            .bind(input.version)
            .bind(input.workflow_state.as_str())
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormTemplateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_templates WHERE id = $1");
        sqlx::query_as::<_, FormTemplateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List templates matching the filter in insertion order.
    pub async fn list(
        pool: &PgPool,
        filter: &TemplateFilter,
    ) -> Result<Vec<FormTemplateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_templates \
             WHERE ($1::TEXT IS NULL OR module = $1) \
               AND ($2::TEXT IS NULL OR entity_type = $2) \
               AND ($3::BIGINT IS NULL OR process_id = $3) \
               AND ($4::BOOLEAN IS NULL OR is_active = $4) \
             ORDER BY id ASC \
             LIMIT $5"
        );
        sqlx::query_as::<_, FormTemplateRow>(&query)
            .bind(&filter.module)
            .bind(&filter.entity_type)
            .bind(filter.process_id)
            .bind(filter.active)
            .bind(filter.effective_limit())
            .fetch_all(pool)
            .await
    }

    /// All versions of a lineage, newest first.
    pub async fn list_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Vec<FormTemplateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_templates \
             WHERE code = $1 \
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, FormTemplateRow>(&query)
            .bind(code)
            .fetch_all(pool)
            .await
    }

    /// Highest version recorded for a lineage, if any.
    pub async fn max_version(pool: &PgPool, code: &str) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(version) FROM form_templates WHERE code = $1",
        )
        .bind(code)
        .fetch_one(pool)
        .await
    }

    /// Update a template. Only supplied fields are applied.
    ///
    /// `description` and `process_id` use `Option<Option<_>>` so that an
    /// explicit `null` clears the column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<FormTemplateRow>, sqlx::Error> {
        let description_provided = input.description.is_some();
        let description = input.description.as_ref().and_then(|v| v.as_deref());
        let process_id_provided = input.process_id.is_some();
        let process_id = input.process_id.flatten();

        let query = format!(
            "UPDATE form_templates SET \
                name        = COALESCE($2, name), \
                description = CASE WHEN $3 THEN $4 ELSE description END, \
                process_id  = CASE WHEN $5 THEN $6 ELSE process_id END, \
                is_active   = COALESCE($7, is_active), \
                updated_at  = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormTemplateRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(description_provided)
            .bind(description)
            .bind(process_id_provided)
            .bind(process_id)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Move a template to `approved` and make it selectable at runtime.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormTemplateRow>, sqlx::Error> {
        let query = format!(
            "UPDATE form_templates SET \
                workflow_state = 'approved', \
                is_active = true, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormTemplateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a template by ID. Fields and answers cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
