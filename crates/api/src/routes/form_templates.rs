//! Route definitions for form templates.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::form_templates;
use crate::state::AppState;

/// Routes mounted at `/form-templates`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /versions         -> list_versions
/// GET    /resolve          -> resolve
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// POST   /{id}/versions    -> create_version
/// POST   /{id}/approve     -> approve
/// GET    /{id}/iso-gap     -> iso_gap
/// POST   /{id}/iso-gap     -> fill_iso_gap
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form_templates::list).post(form_templates::create))
        .route("/versions", get(form_templates::list_versions))
        .route("/resolve", get(form_templates::resolve))
        .route(
            "/{id}",
            get(form_templates::get_by_id)
                .put(form_templates::update)
                .delete(form_templates::delete),
        )
        .route("/{id}/versions", post(form_templates::create_version))
        .route("/{id}/approve", post(form_templates::approve))
        .route(
            "/{id}/iso-gap",
            get(form_templates::iso_gap).post(form_templates::fill_iso_gap),
        )
}
