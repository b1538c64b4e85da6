//! Use cases composed over the store ports.
//!
//! [`ChecklistEngine`] is cheap to clone and is the single entry point the
//! HTTP layer talks to. Its methods are split by concern:
//!
//! - `templates`: template CRUD, versioning and approval
//! - `fields`: field CRUD with payload validation
//! - `iso_gap`: canonical ISO gap analysis and gap-fill
//! - `resolver`: runtime template selection with fallback
//! - `answers`: answer listing and batched saves
//! - `execution`: the merged field-by-answer view for one entity

mod answers;
mod execution;
mod fields;
mod iso_gap;
mod resolver;
mod templates;

use std::sync::Arc;

use crate::ports::ChecklistStore;

pub use execution::{ExecutionItem, ExecutionView};
pub use iso_gap::GapFillReport;
pub use resolver::ResolveContext;

#[derive(Clone)]
pub struct ChecklistEngine {
    store: Arc<dyn ChecklistStore>,
}

impl ChecklistEngine {
    pub fn new(store: Arc<dyn ChecklistStore>) -> Self {
        Self { store }
    }

    /// Probe the backing store.
    pub async fn ping(&self) -> crate::error::CoreResult<()> {
        self.store.ping().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::ChecklistEngine;
    use crate::field::{CreateField, FieldDefinition};
    use crate::memory::InMemoryChecklistStore;
    use crate::template::{CreateTemplate, Template};
    use crate::types::DbId;

    pub fn engine() -> ChecklistEngine {
        ChecklistEngine::new(Arc::new(InMemoryChecklistStore::new()))
    }

    pub fn create_template(code: &str, process_id: Option<DbId>, active: bool) -> CreateTemplate {
        CreateTemplate {
            code: code.to_string(),
            name: format!("Checklist {code}"),
            description: None,
            module: "audits".to_string(),
            entity_type: "audit".to_string(),
            process_id,
            active,
        }
    }

    pub async fn template(engine: &ChecklistEngine, code: &str) -> Template {
        engine
            .create_template(&create_template(code, None, false))
            .await
            .unwrap()
    }

    pub fn text_field(template_id: DbId, name: &str, required: bool) -> CreateField {
        CreateField {
            template_id,
            technical_name: name.to_string(),
            label: name.to_uppercase(),
            field_type: "text".to_string(),
            required,
            iso_section: None,
            iso_clause: None,
            iso_subclause: None,
            evidence_required: false,
            sort_order: 0,
            active: true,
            options: serde_json::Value::Null,
        }
    }

    pub async fn field(
        engine: &ChecklistEngine,
        template_id: DbId,
        name: &str,
        required: bool,
    ) -> FieldDefinition {
        engine
            .create_field(&text_field(template_id, name, required))
            .await
            .unwrap()
    }
}
