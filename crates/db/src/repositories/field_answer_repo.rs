//! Repository for the `field_answers` table.

use qms_core::types::DbId;
use sqlx::PgPool;

use crate::models::field_answer::FieldAnswerRow;

/// Column list for field_answers queries.
const COLUMNS: &str = "id, template_field_id, entity_id, value, last_saved_at";

/// Provides lookup and upsert operations for field answers.
pub struct FieldAnswerRepo;

impl FieldAnswerRepo {
    /// All answers recorded for an execution entity.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_id: DbId,
    ) -> Result<Vec<FieldAnswerRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM field_answers \
             WHERE entity_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, FieldAnswerRow>(&query)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// The answer for one `(entity, field)` pair, if any.
    pub async fn find_for_field(
        pool: &PgPool,
        entity_id: DbId,
        template_field_id: DbId,
    ) -> Result<Option<FieldAnswerRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM field_answers \
             WHERE entity_id = $1 AND template_field_id = $2"
        );
        sqlx::query_as::<_, FieldAnswerRow>(&query)
            .bind(entity_id)
            .bind(template_field_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the value of an existing answer row.
    ///
    /// The row must belong to `(entity_id, template_field_id)`; a row owned by
    /// another pair is left alone and `None` is returned.
    pub async fn update_value(
        pool: &PgPool,
        id: DbId,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> Result<Option<FieldAnswerRow>, sqlx::Error> {
        let query = format!(
            "UPDATE field_answers SET value = $2, last_saved_at = now() \
             WHERE id = $1 AND entity_id = $3 AND template_field_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FieldAnswerRow>(&query)
            .bind(id)
            .bind(value)
            .bind(entity_id)
            .bind(template_field_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert an answer, or overwrite the value if the pair already has one.
    pub async fn upsert(
        pool: &PgPool,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> Result<FieldAnswerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO field_answers (entity_id, template_field_id, value) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (entity_id, template_field_id) \
             DO UPDATE SET value = EXCLUDED.value, last_saved_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FieldAnswerRow>(&query)
            .bind(entity_id)
            .bind(template_field_id)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}
