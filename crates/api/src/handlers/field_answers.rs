//! Handlers for the `/field-answers` resource.
//!
//! A batch that fails validation is a 400 and nothing is written. Once
//! validation passes, per-entry write failures are reported in the body of
//! a 200 rather than failing the request.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use qms_core::answer::{BatchReport, SaveAnswers, SaveOutcome};
use qms_core::error::CoreError;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::EntityParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a successful batched save.
#[derive(Debug, Serialize)]
pub struct SaveBatchResponse {
    /// `persisted` or `partially_persisted`.
    pub outcome: &'static str,
    #[serde(flatten)]
    pub report: BatchReport,
}

impl From<BatchReport> for SaveBatchResponse {
    fn from(report: BatchReport) -> Self {
        let outcome = if report.is_complete() {
            "persisted"
        } else {
            "partially_persisted"
        };
        Self { outcome, report }
    }
}

/// GET /api/v1/field-answers?entity_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EntityParams>,
) -> AppResult<impl IntoResponse> {
    let answers = state.engine.list_answers(params.entity_id).await?;
    Ok(Json(DataResponse { data: answers }))
}

/// POST /api/v1/field-answers/batch
pub async fn save_batch(
    State(state): State<AppState>,
    Json(input): Json<SaveAnswers>,
) -> AppResult<impl IntoResponse> {
    match state.engine.save_answers(&input).await? {
        SaveOutcome::Rejected(rejection) => {
            Err(AppError::Core(CoreError::Validation(rejection.reason)))
        }
        SaveOutcome::PartiallyPersisted(report) => Ok(Json(DataResponse {
            data: SaveBatchResponse::from(report),
        })),
    }
}
