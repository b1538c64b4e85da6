use serde::Serialize;
use tracing::info;

use super::ChecklistEngine;
use crate::error::CoreResult;
use crate::field::{FieldDefinition, FieldFilter, NewField};
use crate::iso_template::missing_canonical_fields;
use crate::template::Template;
use crate::types::DbId;

/// Result of [`ChecklistEngine::apply_iso_gap_fill_and_approve`].
#[derive(Debug, Clone, Serialize)]
pub struct GapFillReport {
    /// The template after the operation (approved and active).
    pub template: Template,
    /// Fields inserted to close the gap, in canonical order.
    pub created: Vec<FieldDefinition>,
    /// Whether this call performed the approval.
    pub approved_now: bool,
}

impl ChecklistEngine {
    /// Canonical fields the template's active fields do not cover yet, as the
    /// rows a gap-fill would insert.
    pub async fn compute_gap(&self, template_id: DbId) -> CoreResult<Vec<NewField>> {
        self.get_template(template_id).await?;
        let fields = self
            .store
            .list_fields(&FieldFilter::active_for(template_id))
            .await?;

        Ok(missing_canonical_fields(&fields)
            .into_iter()
            .map(|c| c.to_new_field(template_id))
            .collect())
    }

    /// Insert every missing canonical field, then approve the template if it
    /// is still a draft.
    ///
    /// Gap-fill and approval are one use case: a filled template is considered
    /// ready for execution. Running this again is a no-op because the second
    /// gap is empty and the template is already approved.
    pub async fn apply_iso_gap_fill_and_approve(
        &self,
        template_id: DbId,
    ) -> CoreResult<GapFillReport> {
        let gap = self.compute_gap(template_id).await?;

        let mut created = Vec::with_capacity(gap.len());
        for new_field in &gap {
            created.push(self.insert_field(new_field).await?);
        }

        let current = self.get_template(template_id).await?;
        let (template, approved_now) = if current.is_approved() {
            (current, false)
        } else {
            (self.approve_template(template_id).await?, true)
        };

        info!(
            template_id,
            created = created.len(),
            approved_now,
            "ISO gap filled"
        );
        Ok(GapFillReport {
            template,
            created,
            approved_now,
        })
    }
}
