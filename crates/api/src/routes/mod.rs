pub mod checklists;
pub mod field_answers;
pub mod form_templates;
pub mod health;
pub mod template_fields;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /form-templates                        list, create
/// /form-templates/versions?code=         version history of a lineage
/// /form-templates/resolve                resolve for an execution context
/// /form-templates/{id}                   get, update, delete
/// /form-templates/{id}/versions          new draft version (POST)
/// /form-templates/{id}/approve           approve (POST)
/// /form-templates/{id}/iso-gap           compute gap (GET), gap-fill and approve (POST)
///
/// /template-fields?template_id=          list, create
/// /template-fields/{id}                  get, update, delete
///
/// /field-answers?entity_id=              list answers of an entity
/// /field-answers/batch                   batched save (POST)
///
/// /checklists/{entity_id}                execution view
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/form-templates", form_templates::router())
        .nest("/template-fields", template_fields::router())
        .nest("/field-answers", field_answers::router())
        .nest("/checklists", checklists::router())
}
