//! Route definitions for template fields.

use axum::routing::get;
use axum::Router;

use crate::handlers::template_fields;
use crate::state::AppState;

/// Routes mounted at `/template-fields`.
///
/// ```text
/// GET    /?template_id=&active=  -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(template_fields::list).post(template_fields::create))
        .route(
            "/{id}",
            get(template_fields::get_by_id)
                .put(template_fields::update)
                .delete(template_fields::delete),
        )
}
