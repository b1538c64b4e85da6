//! [`ChecklistStore`] implementation over the repositories.
//!
//! This is the only place `sqlx::Error` is translated into [`CoreError`].

use async_trait::async_trait;
use qms_core::answer::FieldAnswer;
use qms_core::error::{CoreError, CoreResult};
use qms_core::field::{FieldChanges, FieldDefinition, FieldFilter, NewField};
use qms_core::ports::{AnswerStore, ChecklistStore, FieldStore, TemplateStore};
use qms_core::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate};
use qms_core::types::DbId;

use crate::repositories::{FieldAnswerRepo, FormTemplateRepo, TemplateFieldRepo};
use crate::DbPool;

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgChecklistStore {
    pool: DbPool,
}

impl PgChecklistStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Classify a sqlx error into a domain error.
///
/// - `RowNotFound` maps to `Internal`: repositories use `fetch_optional`
///   wherever absence is expected, so a missing row here is a bug.
/// - Unique violations (code 23505) on a `uq_`-prefixed constraint map to
///   `Conflict`.
/// - Everything else maps to `Internal` and is logged.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("database error: {err}"))
}

fn convert_all<R, T>(rows: Vec<R>) -> CoreResult<Vec<T>>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl TemplateStore for PgChecklistStore {
    async fn insert_template(&self, input: &NewTemplate) -> CoreResult<Template> {
        FormTemplateRepo::create(&self.pool, input)
            .await
            .map_err(map_db_error)?
            .try_into()
    }

    async fn find_template(&self, id: DbId) -> CoreResult<Option<Template>> {
        FormTemplateRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Template::try_from)
            .transpose()
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> CoreResult<Vec<Template>> {
        let rows = FormTemplateRepo::list(&self.pool, filter)
            .await
            .map_err(map_db_error)?;
        convert_all(rows)
    }

    async fn list_template_versions(&self, code: &str) -> CoreResult<Vec<Template>> {
        let rows = FormTemplateRepo::list_by_code(&self.pool, code)
            .await
            .map_err(map_db_error)?;
        convert_all(rows)
    }

    async fn max_template_version(&self, code: &str) -> CoreResult<Option<i32>> {
        FormTemplateRepo::max_version(&self.pool, code)
            .await
            .map_err(map_db_error)
    }

    async fn update_template(
        &self,
        id: DbId,
        input: &UpdateTemplate,
    ) -> CoreResult<Option<Template>> {
        FormTemplateRepo::update(&self.pool, id, input)
            .await
            .map_err(map_db_error)?
            .map(Template::try_from)
            .transpose()
    }

    async fn mark_template_approved(&self, id: DbId) -> CoreResult<Option<Template>> {
        FormTemplateRepo::approve(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Template::try_from)
            .transpose()
    }

    async fn delete_template(&self, id: DbId) -> CoreResult<bool> {
        FormTemplateRepo::delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl FieldStore for PgChecklistStore {
    async fn insert_field(&self, input: &NewField) -> CoreResult<FieldDefinition> {
        TemplateFieldRepo::create(&self.pool, input)
            .await
            .map_err(map_db_error)?
            .try_into()
    }

    async fn find_field(&self, id: DbId) -> CoreResult<Option<FieldDefinition>> {
        TemplateFieldRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(FieldDefinition::try_from)
            .transpose()
    }

    async fn list_fields(&self, filter: &FieldFilter) -> CoreResult<Vec<FieldDefinition>> {
        let rows = TemplateFieldRepo::list(&self.pool, filter)
            .await
            .map_err(map_db_error)?;
        convert_all(rows)
    }

    async fn update_field(
        &self,
        id: DbId,
        changes: &FieldChanges,
    ) -> CoreResult<Option<FieldDefinition>> {
        TemplateFieldRepo::update(&self.pool, id, changes)
            .await
            .map_err(map_db_error)?
            .map(FieldDefinition::try_from)
            .transpose()
    }

    async fn delete_field(&self, id: DbId) -> CoreResult<bool> {
        TemplateFieldRepo::delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl AnswerStore for PgChecklistStore {
    async fn list_answers(&self, entity_id: DbId) -> CoreResult<Vec<FieldAnswer>> {
        let rows = FieldAnswerRepo::list_for_entity(&self.pool, entity_id)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(FieldAnswer::from).collect())
    }

    async fn find_answer(
        &self,
        entity_id: DbId,
        template_field_id: DbId,
    ) -> CoreResult<Option<FieldAnswer>> {
        Ok(
            FieldAnswerRepo::find_for_field(&self.pool, entity_id, template_field_id)
                .await
                .map_err(map_db_error)?
                .map(FieldAnswer::from),
        )
    }

    async fn update_answer_value(
        &self,
        id: DbId,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> CoreResult<Option<FieldAnswer>> {
        Ok(FieldAnswerRepo::update_value(&self.pool, id, entity_id, template_field_id, value)
            .await
            .map_err(map_db_error)?
            .map(FieldAnswer::from))
    }

    async fn upsert_answer(
        &self,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> CoreResult<FieldAnswer> {
        FieldAnswerRepo::upsert(&self.pool, entity_id, template_field_id, value)
            .await
            .map(FieldAnswer::from)
            .map_err(map_db_error)
    }
}

#[async_trait]
impl ChecklistStore for PgChecklistStore {
    async fn ping(&self) -> CoreResult<()> {
        crate::health_check(&self.pool).await.map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_become_internal() {
        let err = map_db_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, CoreError::Internal(_)));

        let err = map_db_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, CoreError::Internal(msg) if msg.starts_with("database error")));
    }
}
