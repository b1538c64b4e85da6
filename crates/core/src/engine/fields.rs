use tracing::info;

use super::ChecklistEngine;
use crate::error::{CoreError, CoreResult};
use crate::field::{
    prepare_create, prepare_update, CreateField, FieldDefinition, FieldFilter, NewField,
    UpdateField,
};
use crate::types::DbId;

impl ChecklistEngine {
    /// Validate and create a field on an existing template.
    pub async fn create_field(&self, input: &CreateField) -> CoreResult<FieldDefinition> {
        let new_field = prepare_create(input)?;
        self.insert_field(&new_field).await
    }

    /// Insert an already-normalized field after checking its template exists.
    pub(crate) async fn insert_field(&self, new_field: &NewField) -> CoreResult<FieldDefinition> {
        self.get_template(new_field.template_id).await?;
        let field = self.store.insert_field(new_field).await?;

        info!(
            field_id = field.id,
            template_id = field.template_id,
            technical_name = %field.technical_name,
            "Template field created"
        );
        Ok(field)
    }

    pub async fn get_field(&self, id: DbId) -> CoreResult<FieldDefinition> {
        self.store
            .find_field(id)
            .await?
            .ok_or_else(|| CoreError::field_not_found(id))
    }

    /// Fields of a template ordered by `sort_order`.
    pub async fn list_fields(&self, filter: &FieldFilter) -> CoreResult<Vec<FieldDefinition>> {
        self.store.list_fields(filter).await
    }

    pub async fn update_field(&self, id: DbId, input: &UpdateField) -> CoreResult<FieldDefinition> {
        let changes = prepare_update(input)?;
        let field = self
            .store
            .update_field(id, &changes)
            .await?
            .ok_or_else(|| CoreError::field_not_found(id))?;

        info!(field_id = id, "Template field updated");
        Ok(field)
    }

    /// Remove a field and the answers given to it.
    pub async fn delete_field(&self, id: DbId) -> CoreResult<()> {
        if !self.store.delete_field(id).await? {
            return Err(CoreError::field_not_found(id));
        }
        info!(field_id = id, "Template field deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use crate::engine::test_support::{engine, field, template, text_field};
    use crate::error::CoreError;
    use crate::field::{FieldFilter, UpdateField};
    use crate::field_type::{Control, FieldType};
    use crate::options::ChoiceOption;

    #[tokio::test]
    async fn create_on_unknown_template_is_not_found() {
        let result = engine().create_field(&text_field(77, "a", true)).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "FormTemplate", id: 77 }));
    }

    #[tokio::test]
    async fn malformed_options_are_rejected_and_nothing_is_stored() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let mut input = text_field(t.id, "resultado", true);
        input.field_type = "select".to_string();
        input.options = json!("[\"conforme\", ");

        assert_matches!(engine.create_field(&input).await, Err(CoreError::Validation(_)));
        let fields = engine
            .list_fields(&FieldFilter {
                template_id: t.id,
                active: None,
            })
            .await
            .unwrap();
        assert!(fields.is_empty());
    }

    #[tokio::test]
    async fn options_from_raw_json_text_are_normalized() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let mut input = text_field(t.id, "aplica", false);
        input.field_type = "radio".to_string();
        input.options = json!(r#"["Sí","No"]"#);

        let created = engine.create_field(&input).await.unwrap();
        assert_eq!(created.field_type, FieldType::Radio);
        assert_eq!(
            created.options,
            vec![ChoiceOption::new("Sí", "Sí"), ChoiceOption::new("No", "No")]
        );
        assert_matches!(created.control(), Control::Choice { .. });
    }

    #[tokio::test]
    async fn list_orders_by_sort_order_and_filters_active() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let mut second = text_field(t.id, "second", false);
        second.sort_order = 2;
        let mut first = text_field(t.id, "first", false);
        first.sort_order = 1;
        let mut hidden = text_field(t.id, "hidden", false);
        hidden.active = false;
        engine.create_field(&second).await.unwrap();
        engine.create_field(&first).await.unwrap();
        engine.create_field(&hidden).await.unwrap();

        let active = engine.list_fields(&FieldFilter::active_for(t.id)).await.unwrap();
        let names: Vec<&str> = active.iter().map(|f| f.technical_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);

        let all = engine
            .list_fields(&FieldFilter {
                template_id: t.id,
                active: None,
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].technical_name, "hidden");
    }

    #[tokio::test]
    async fn update_validates_and_patches() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let f = field(&engine, t.id, "a", false).await;

        let blank = UpdateField {
            label: Some("  ".to_string()),
            ..Default::default()
        };
        assert_matches!(engine.update_field(f.id, &blank).await, Err(CoreError::Validation(_)));

        let retype = UpdateField {
            field_type: Some("select".to_string()),
            options: Some(json!([{ "label": "Cumple", "value": "cumple" }])),
            required: Some(true),
            ..Default::default()
        };
        let updated = engine.update_field(f.id, &retype).await.unwrap();
        assert_eq!(updated.field_type, FieldType::Select);
        assert!(updated.required);
        assert_eq!(updated.options, vec![ChoiceOption::new("Cumple", "cumple")]);
    }

    #[tokio::test]
    async fn delete_unknown_field_is_not_found() {
        let engine = engine();
        assert_matches!(
            engine.delete_field(5).await,
            Err(CoreError::NotFound { entity: "TemplateField", id: 5 })
        );
    }
}
