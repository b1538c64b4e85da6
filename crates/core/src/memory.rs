//! In-memory implementation of the store ports.
//!
//! Mirrors the PostgreSQL schema's constraints that the engine can observe:
//! insertion-order listing, the `(code, version)` uniqueness guard, foreign
//! keys from fields to templates and from answers to fields, one answer per
//! `(entity, field)`, and cascading deletes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::answer::FieldAnswer;
use crate::error::{CoreError, CoreResult};
use crate::field::{apply_changes, FieldChanges, FieldDefinition, FieldFilter, NewField};
use crate::ports::{AnswerStore, ChecklistStore, FieldStore, TemplateStore};
use crate::template::{NewTemplate, Template, TemplateFilter, UpdateTemplate, WorkflowState};
use crate::types::DbId;

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    templates: BTreeMap<DbId, Template>,
    fields: BTreeMap<DbId, FieldDefinition>,
    answers: BTreeMap<DbId, FieldAnswer>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store. Ids are shared across tables and start at 1.
#[derive(Debug, Default)]
pub struct InMemoryChecklistStore {
    tables: RwLock<Tables>,
}

impl InMemoryChecklistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for InMemoryChecklistStore {
    async fn insert_template(&self, input: &NewTemplate) -> CoreResult<Template> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .templates
            .values()
            .any(|t| t.code == input.code && t.version == input.version);
        if duplicate {
            return Err(CoreError::Conflict(
                "Duplicate value violates unique constraint: uq_form_templates_code_version"
                    .to_string(),
            ));
        }

        let id = tables.allocate_id();
        let now = Utc::now();
        let template = Template {
            id,
            code: input.code.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            module: input.module.clone(),
            entity_type: input.entity_type.clone(),
            process_id: input.process_id,
            version: input.version,
            workflow_state: input.workflow_state,
            active: input.active,
            created_at: now,
            updated_at: now,
        };
        tables.templates.insert(id, template.clone());
        Ok(template)
    }

    async fn find_template(&self, id: DbId) -> CoreResult<Option<Template>> {
        Ok(self.tables.read().await.templates.get(&id).cloned())
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> CoreResult<Vec<Template>> {
        let limit = usize::try_from(filter.effective_limit()).unwrap_or(usize::MAX);
        Ok(self
            .tables
            .read()
            .await
            .templates
            .values()
            .filter(|t| filter.matches(t))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_template_versions(&self, code: &str) -> CoreResult<Vec<Template>> {
        let mut versions: Vec<Template> = self
            .tables
            .read()
            .await
            .templates
            .values()
            .filter(|t| t.code == code)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    async fn max_template_version(&self, code: &str) -> CoreResult<Option<i32>> {
        Ok(self
            .tables
            .read()
            .await
            .templates
            .values()
            .filter(|t| t.code == code)
            .map(|t| t.version)
            .max())
    }

    async fn update_template(
        &self,
        id: DbId,
        input: &UpdateTemplate,
    ) -> CoreResult<Option<Template>> {
        let mut tables = self.tables.write().await;
        let Some(template) = tables.templates.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            template.name = name.clone();
        }
        if let Some(description) = &input.description {
            template.description = description.clone();
        }
        if let Some(process_id) = input.process_id {
            template.process_id = process_id;
        }
        if let Some(active) = input.active {
            template.active = active;
        }
        template.updated_at = Utc::now();
        Ok(Some(template.clone()))
    }

    async fn mark_template_approved(&self, id: DbId) -> CoreResult<Option<Template>> {
        let mut tables = self.tables.write().await;
        let Some(template) = tables.templates.get_mut(&id) else {
            return Ok(None);
        };
        template.workflow_state = WorkflowState::Approved;
        template.active = true;
        template.updated_at = Utc::now();
        Ok(Some(template.clone()))
    }

    async fn delete_template(&self, id: DbId) -> CoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.templates.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<DbId> = tables
            .fields
            .values()
            .filter(|f| f.template_id == id)
            .map(|f| f.id)
            .collect();
        tables.fields.retain(|_, f| f.template_id != id);
        tables
            .answers
            .retain(|_, a| !owned.contains(&a.template_field_id));
        Ok(true)
    }
}

#[async_trait]
impl FieldStore for InMemoryChecklistStore {
    async fn insert_field(&self, input: &NewField) -> CoreResult<FieldDefinition> {
        let mut tables = self.tables.write().await;
        if !tables.templates.contains_key(&input.template_id) {
            return Err(CoreError::Internal(format!(
                "template_fields.template_id references missing template {}",
                input.template_id
            )));
        }

        let id = tables.allocate_id();
        let now = Utc::now();
        let field = FieldDefinition {
            id,
            template_id: input.template_id,
            technical_name: input.technical_name.clone(),
            label: input.label.clone(),
            field_type: input.field_type,
            required: input.required,
            iso_section: input.iso_section.clone(),
            iso_clause: input.iso_clause.clone(),
            iso_subclause: input.iso_subclause.clone(),
            evidence_required: input.evidence_required,
            sort_order: input.sort_order,
            active: input.active,
            options: input.options.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.fields.insert(id, field.clone());
        Ok(field)
    }

    async fn find_field(&self, id: DbId) -> CoreResult<Option<FieldDefinition>> {
        Ok(self.tables.read().await.fields.get(&id).cloned())
    }

    async fn list_fields(&self, filter: &FieldFilter) -> CoreResult<Vec<FieldDefinition>> {
        let mut fields: Vec<FieldDefinition> = self
            .tables
            .read()
            .await
            .fields
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        fields.sort_by_key(|f| (f.sort_order, f.id));
        Ok(fields)
    }

    async fn update_field(
        &self,
        id: DbId,
        changes: &FieldChanges,
    ) -> CoreResult<Option<FieldDefinition>> {
        let mut tables = self.tables.write().await;
        let Some(field) = tables.fields.get_mut(&id) else {
            return Ok(None);
        };
        apply_changes(field, changes);
        field.updated_at = Utc::now();
        Ok(Some(field.clone()))
    }

    async fn delete_field(&self, id: DbId) -> CoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.fields.remove(&id).is_none() {
            return Ok(false);
        }
        tables.answers.retain(|_, a| a.template_field_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AnswerStore for InMemoryChecklistStore {
    async fn list_answers(&self, entity_id: DbId) -> CoreResult<Vec<FieldAnswer>> {
        Ok(self
            .tables
            .read()
            .await
            .answers
            .values()
            .filter(|a| a.entity_id == entity_id)
            .cloned()
            .collect())
    }

    async fn find_answer(
        &self,
        entity_id: DbId,
        template_field_id: DbId,
    ) -> CoreResult<Option<FieldAnswer>> {
        Ok(self
            .tables
            .read()
            .await
            .answers
            .values()
            .find(|a| a.entity_id == entity_id && a.template_field_id == template_field_id)
            .cloned())
    }

    async fn update_answer_value(
        &self,
        id: DbId,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> CoreResult<Option<FieldAnswer>> {
        let mut tables = self.tables.write().await;
        let Some(answer) = tables
            .answers
            .get_mut(&id)
            .filter(|a| a.entity_id == entity_id && a.template_field_id == template_field_id)
        else {
            return Ok(None);
        };
        answer.value = value.to_string();
        answer.last_saved_at = Utc::now();
        Ok(Some(answer.clone()))
    }

    async fn upsert_answer(
        &self,
        entity_id: DbId,
        template_field_id: DbId,
        value: &str,
    ) -> CoreResult<FieldAnswer> {
        let mut tables = self.tables.write().await;
        if !tables.fields.contains_key(&template_field_id) {
            return Err(CoreError::Internal(format!(
                "field_answers.template_field_id references missing field {template_field_id}"
            )));
        }

        let now = Utc::now();
        if let Some(existing) = tables
            .answers
            .values_mut()
            .find(|a| a.entity_id == entity_id && a.template_field_id == template_field_id)
        {
            existing.value = value.to_string();
            existing.last_saved_at = now;
            return Ok(existing.clone());
        }

        let id = tables.allocate_id();
        let answer = FieldAnswer {
            id,
            template_field_id,
            entity_id,
            value: value.to_string(),
            last_saved_at: now,
        };
        tables.answers.insert(id, answer.clone());
        Ok(answer)
    }
}

#[async_trait]
impl ChecklistStore for InMemoryChecklistStore {
    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }
}
