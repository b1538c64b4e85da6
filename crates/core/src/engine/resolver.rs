use serde::Deserialize;
use tracing::debug;

use super::ChecklistEngine;
use crate::error::CoreResult;
use crate::template::{Template, TemplateFilter};
use crate::types::DbId;

/// Where a checklist is being executed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolveContext {
    pub module: String,
    pub entity_type: String,
    pub process_id: Option<DbId>,
}

impl ChecklistEngine {
    /// Pick the active template for an execution context.
    ///
    /// A process-specific lookup that finds nothing falls back to the same
    /// query without the process. Among several matches the store's order
    /// (insertion order) decides. `None` means "no checklist", not an error.
    pub async fn resolve_template(&self, ctx: &ResolveContext) -> CoreResult<Option<Template>> {
        let mut filter = TemplateFilter {
            module: Some(ctx.module.clone()),
            entity_type: Some(ctx.entity_type.clone()),
            process_id: ctx.process_id,
            active: Some(true),
            limit: None,
        };

        let mut matches = self.store.list_templates(&filter).await?;
        if matches.is_empty() && ctx.process_id.is_some() {
            debug!(
                module = %ctx.module,
                entity_type = %ctx.entity_type,
                process_id = ?ctx.process_id,
                "No process-specific template, trying general lookup"
            );
            filter.process_id = None;
            matches = self.store.list_templates(&filter).await?;
        }

        Ok(matches.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::ResolveContext;
    use crate::engine::test_support::{create_template, engine};

    fn ctx(process_id: Option<i64>) -> ResolveContext {
        ResolveContext {
            module: "audits".to_string(),
            entity_type: "audit".to_string(),
            process_id,
        }
    }

    #[tokio::test]
    async fn falls_back_to_general_template() {
        let engine = engine();
        let general = engine
            .create_template(&create_template("GEN", None, true))
            .await
            .unwrap();

        let resolved = engine.resolve_template(&ctx(Some(42))).await.unwrap();
        assert_eq!(resolved.map(|t| t.id), Some(general.id));
    }

    #[tokio::test]
    async fn process_specific_template_wins() {
        let engine = engine();
        engine
            .create_template(&create_template("GEN", None, true))
            .await
            .unwrap();
        let specific = engine
            .create_template(&create_template("P42", Some(42), true))
            .await
            .unwrap();

        let resolved = engine.resolve_template(&ctx(Some(42))).await.unwrap();
        assert_eq!(resolved.map(|t| t.id), Some(specific.id));
    }

    #[tokio::test]
    async fn inactive_templates_are_never_selected() {
        let engine = engine();
        engine
            .create_template(&create_template("DRAFT", None, false))
            .await
            .unwrap();
        assert!(engine.resolve_template(&ctx(None)).await.unwrap().is_none());
        assert!(engine.resolve_template(&ctx(Some(1))).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_inserted_match_wins() {
        let engine = engine();
        let first = engine
            .create_template(&create_template("A", None, true))
            .await
            .unwrap();
        engine
            .create_template(&create_template("B", None, true))
            .await
            .unwrap();
        let resolved = engine.resolve_template(&ctx(None)).await.unwrap();
        assert_eq!(resolved.map(|t| t.id), Some(first.id));
    }

    #[tokio::test]
    async fn other_modules_are_ignored() {
        let engine = engine();
        let mut other = create_template("NC", None, true);
        other.module = "nonconformities".to_string();
        engine.create_template(&other).await.unwrap();
        assert!(engine.resolve_template(&ctx(None)).await.unwrap().is_none());
    }
}
