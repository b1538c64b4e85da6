use tracing::info;

use super::ChecklistEngine;
use crate::error::{CoreError, CoreResult};
use crate::template::{
    validate_create, validate_update, CreateTemplate, NewTemplate, Template, TemplateFilter,
    UpdateTemplate, WorkflowState,
};
use crate::types::DbId;

impl ChecklistEngine {
    /// Create version 1 of a new template lineage, in draft.
    pub async fn create_template(&self, input: &CreateTemplate) -> CoreResult<Template> {
        validate_create(input)?;

        let template = self
            .store
            .insert_template(&NewTemplate {
                code: input.code.trim().to_string(),
                name: input.name.trim().to_string(),
                description: input.description.clone(),
                module: input.module.trim().to_string(),
                entity_type: input.entity_type.trim().to_string(),
                process_id: input.process_id,
                version: 1,
                workflow_state: WorkflowState::Draft,
                active: input.active,
            })
            .await?;

        info!(template_id = template.id, code = %template.code, "Form template created");
        Ok(template)
    }

    pub async fn get_template(&self, id: DbId) -> CoreResult<Template> {
        self.store
            .find_template(id)
            .await?
            .ok_or_else(|| CoreError::template_not_found(id))
    }

    pub async fn list_templates(&self, filter: &TemplateFilter) -> CoreResult<Vec<Template>> {
        self.store.list_templates(filter).await
    }

    /// Every version of a lineage, newest first.
    pub async fn list_template_versions(&self, code: &str) -> CoreResult<Vec<Template>> {
        if code.trim().is_empty() {
            return Err(CoreError::Validation("code must not be blank".to_string()));
        }
        self.store.list_template_versions(code.trim()).await
    }

    pub async fn update_template(&self, id: DbId, input: &UpdateTemplate) -> CoreResult<Template> {
        validate_update(input)?;
        let template = self
            .store
            .update_template(id, input)
            .await?
            .ok_or_else(|| CoreError::template_not_found(id))?;

        info!(template_id = id, "Form template updated");
        Ok(template)
    }

    /// Remove a template. Its fields and their answers go with it.
    pub async fn delete_template(&self, id: DbId) -> CoreResult<()> {
        if !self.store.delete_template(id).await? {
            return Err(CoreError::template_not_found(id));
        }
        info!(template_id = id, "Form template deleted");
        Ok(())
    }

    /// Branch a new draft version of the lineage `id` belongs to.
    ///
    /// The new row copies the template's metadata with
    /// `version = max(version for code) + 1`, `draft`, inactive. Fields are
    /// not copied; the ISO gap-fill is the way to repopulate a new version.
    pub async fn create_new_version(&self, id: DbId) -> CoreResult<Template> {
        let source = self.get_template(id).await?;
        let current_max = self
            .store
            .max_template_version(&source.code)
            .await?
            .unwrap_or(source.version);

        let template = self
            .store
            .insert_template(&NewTemplate {
                code: source.code.clone(),
                name: source.name.clone(),
                description: source.description.clone(),
                module: source.module.clone(),
                entity_type: source.entity_type.clone(),
                process_id: source.process_id,
                version: current_max + 1,
                workflow_state: WorkflowState::Draft,
                active: false,
            })
            .await?;

        info!(
            template_id = template.id,
            source_id = id,
            code = %template.code,
            version = template.version,
            "Form template version created"
        );
        Ok(template)
    }

    /// Approve and activate a template.
    ///
    /// No completeness check against the ISO gap is made here.
    pub async fn approve_template(&self, id: DbId) -> CoreResult<Template> {
        let template = self
            .store
            .mark_template_approved(id)
            .await?
            .ok_or_else(|| CoreError::template_not_found(id))?;

        info!(template_id = id, "Form template approved");
        Ok(template)
    }
}
