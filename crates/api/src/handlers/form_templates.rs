//! Handlers for the `/form-templates` resource.
//!
//! Templates are versioned by `(code, version)`. Approval and ISO gap-fill
//! are exposed as sub-resources.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use qms_core::engine::ResolveContext;
use qms_core::template::{CreateTemplate, TemplateFilter, UpdateTemplate};
use qms_core::types::DbId;

use crate::error::AppResult;
use crate::query::VersionParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/form-templates?module=&entity_type=&process_id=&active=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> AppResult<impl IntoResponse> {
    let templates = state.engine.list_templates(&filter).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/form-templates
///
/// Creates version 1 of a new lineage in the draft state.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<impl IntoResponse> {
    let template = state.engine.create_template(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/form-templates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = state.engine.get_template(id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/form-templates/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<impl IntoResponse> {
    let template = state.engine.update_template(id, &input).await?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/form-templates/{id}
///
/// Removes the template with its fields and their answers.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Versioning and lifecycle
// ---------------------------------------------------------------------------

/// GET /api/v1/form-templates/versions?code=
pub async fn list_versions(
    State(state): State<AppState>,
    Query(params): Query<VersionParams>,
) -> AppResult<impl IntoResponse> {
    let versions = state.engine.list_template_versions(&params.code).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/form-templates/{id}/versions
///
/// Starts a new draft version of the template's lineage. Fields are not copied.
pub async fn create_version(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = state.engine.create_new_version(id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// POST /api/v1/form-templates/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = state.engine.approve_template(id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// GET /api/v1/form-templates/resolve?module=&entity_type=&process_id=
///
/// `data` is `null` when no active template applies.
pub async fn resolve(
    State(state): State<AppState>,
    Query(ctx): Query<ResolveContext>,
) -> AppResult<impl IntoResponse> {
    let template = state.engine.resolve_template(&ctx).await?;
    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// ISO gap
// ---------------------------------------------------------------------------

/// GET /api/v1/form-templates/{id}/iso-gap
///
/// Lists the canonical fields a gap-fill would add, without writing.
pub async fn iso_gap(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let missing = state.engine.compute_gap(id).await?;
    Ok(Json(DataResponse { data: missing }))
}

/// POST /api/v1/form-templates/{id}/iso-gap
///
/// Adds the missing canonical fields and approves the template.
pub async fn fill_iso_gap(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = state.engine.apply_iso_gap_fill_and_approve(id).await?;
    Ok(Json(DataResponse { data: report }))
}
