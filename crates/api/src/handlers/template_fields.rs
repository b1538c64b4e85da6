//! Handlers for the `/template-fields` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use qms_core::field::{CreateField, FieldFilter, UpdateField};
use qms_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/template-fields?template_id=&active=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<FieldFilter>,
) -> AppResult<impl IntoResponse> {
    let fields = state.engine.list_fields(&filter).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// POST /api/v1/template-fields
///
/// `options` may be a JSON array or a string holding one.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateField>,
) -> AppResult<impl IntoResponse> {
    let field = state.engine.create_field(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: field })))
}

/// GET /api/v1/template-fields/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let field = state.engine.get_field(id).await?;
    Ok(Json(DataResponse { data: field }))
}

/// PUT /api/v1/template-fields/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateField>,
) -> AppResult<impl IntoResponse> {
    let field = state.engine.update_field(id, &input).await?;
    Ok(Json(DataResponse { data: field }))
}

/// DELETE /api/v1/template-fields/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_field(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
