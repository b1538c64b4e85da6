use axum::routing::{get, post};
use axum::Router;

use crate::handlers::field_answers;
use crate::state::AppState;

/// Routes mounted at `/field-answers`.
///
/// ```text
/// GET    /?entity_id=   -> list
/// POST   /batch         -> save_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(field_answers::list))
        .route("/batch", post(field_answers::save_batch))
}
