//! Store ports consumed by the engine.
//!
//! Implementations: `qms_db::PgChecklistStore` (PostgreSQL) and
//! [`crate::memory::InMemoryChecklistStore`]. Every call is an independent,
//! at-most-once request; retrying is the caller's business.

use async_trait::async_trait;

use crate::answer::FieldAnswer;
use crate::error::CoreResult;
use crate::field::{FieldChanges, FieldDefinition, FieldFilter, NewField};
use crate::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate};
use crate::types::DbId;

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn insert_template(&self, input: &NewTemplate) -> CoreResult<Template>;

    async fn find_template(&self, id: DbId) -> CoreResult<Option<Template>>;

    /// Matching templates in insertion order, truncated to the filter's limit.
    async fn list_templates(&self, filter: &TemplateFilter) -> CoreResult<Vec<Template>>;

    /// All versions sharing `code`, newest first.
    async fn list_template_versions(&self, code: &str) -> CoreResult<Vec<Template>>;

    async fn max_template_version(&self, code: &str) -> CoreResult<Option<i32>>;

    async fn update_template(
        &self,
        id: DbId,
        input: &UpdateTemplate,
    ) -> CoreResult<Option<Template>>;

    /// Set `workflow_state = approved` and `active = true`.
    async fn mark_template_approved(&self, id: DbId) -> CoreResult<Option<Template>>;

    /// Remove the template together with its fields and their answers.
    async fn delete_template(&self, id: DbId) -> CoreResult<bool>;
}

#[async_trait]
pub trait FieldStore: Send + Sync {
    async fn insert_field(&self, input: &NewField) -> CoreResult<FieldDefinition>;

    async fn find_field(&self, id: DbId) -> CoreResult<Option<FieldDefinition>>;

    /// Fields ordered by `sort_order`, then id.
    async fn list_fields(&self, filter: &FieldFilter) -> CoreResult<Vec<FieldDefinition>>;

    async fn update_field(
        &self,
        id: DbId,
        changes: &FieldChanges,
    ) -> CoreResult<Option<FieldDefinition>>;

    /// Remove the field together with its answers.
    async fn delete_field(&self, id: DbId) -> CoreResult<bool>;
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    async fn list_answers(&self, entity_id: DbId) -> CoreResult<Vec<FieldAnswer>>;

    async fn find_answer(
        &self,
        entity_id: DbId,
        template_field_id: DbId,
    ) -> CoreResult<Option<FieldAnswer>>;

    /// Overwrite answer `id`, provided it belongs to the given entity and
    /// field. `None` when no such row exists.
    async fn update_answer_value(
        &self,
        id: DbId,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> CoreResult<Option<FieldAnswer>>;

    /// Insert, or overwrite the value if a row for the pair already exists.
    async fn upsert_answer(
        &self,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> CoreResult<FieldAnswer>;
}

/// Everything the engine needs from persistence.
#[async_trait]
pub trait ChecklistStore: TemplateStore + FieldStore + AnswerStore {
    /// Reachability check for health reporting.
    async fn ping(&self) -> CoreResult<()>;
}
