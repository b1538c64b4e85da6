use std::collections::HashMap;

use futures::try_join;
use serde::Serialize;

use super::{ChecklistEngine, ResolveContext};
use crate::answer::FieldAnswer;
use crate::error::CoreResult;
use crate::field::{FieldDefinition, FieldFilter};
use crate::field_type::{AnswerValue, Control};
use crate::template::Template;
use crate::types::DbId;

/// One field as the auditor sees it: its control and any prior answer.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionItem {
    pub field: FieldDefinition,
    pub control: Control,
    pub answer: Option<FieldAnswer>,
    pub value: AnswerValue,
}

/// Everything needed to render a checklist for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionView {
    pub entity_id: DbId,
    pub template: Option<Template>,
    pub items: Vec<ExecutionItem>,
}

impl ChecklistEngine {
    /// Resolve the template for `ctx` and build the view for `entity_id`.
    ///
    /// With no applicable template the view is empty.
    pub async fn execution_view(
        &self,
        ctx: &ResolveContext,
        entity_id: DbId,
    ) -> CoreResult<ExecutionView> {
        match self.resolve_template(ctx).await? {
            Some(template) => self.assemble_view(template.id, entity_id).await,
            None => Ok(ExecutionView {
                entity_id,
                template: None,
                items: Vec::new(),
            }),
        }
    }

    /// Load template, active fields and prior answers concurrently, then join
    /// answers to fields by `template_field_id`.
    pub async fn assemble_view(&self, template_id: DbId, entity_id: DbId) -> CoreResult<ExecutionView> {
        let active_fields = FieldFilter::active_for(template_id);
        let (template, fields, answers) = try_join!(
            self.get_template(template_id),
            self.store.list_fields(&active_fields),
            self.store.list_answers(entity_id),
        )?;

        let mut by_field: HashMap<DbId, FieldAnswer> = answers
            .into_iter()
            .map(|a| (a.template_field_id, a))
            .collect();

        let items = fields
            .into_iter()
            .map(|field| {
                let control = field.control();
                let answer = by_field.remove(&field.id);
                let value = answer
                    .as_ref()
                    .map_or(AnswerValue::Empty, |a| control.deserialize(&a.value));
                ExecutionItem {
                    field,
                    control,
                    answer,
                    value,
                }
            })
            .collect();

        Ok(ExecutionView {
            entity_id,
            template: Some(template),
            items,
        })
    }
}
