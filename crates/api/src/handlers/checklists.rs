use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use qms_core::engine::ResolveContext;
use qms_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/checklists/{entity_id}?module=&entity_type=&process_id=
///
/// Resolves the template for the context and merges its active fields with
/// the entity's saved answers. An unresolvable context yields an empty view.
pub async fn execution_view(
    State(state): State<AppState>,
    Path(entity_id): Path<DbId>,
    Query(ctx): Query<ResolveContext>,
) -> AppResult<impl IntoResponse> {
    let view = state.engine.execution_view(&ctx, entity_id).await?;
    Ok(Json(DataResponse { data: view }))
}
