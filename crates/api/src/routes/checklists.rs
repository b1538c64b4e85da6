use axum::routing::get;
use axum::Router;

use crate::handlers::checklists;
use crate::state::AppState;

/// Routes mounted at `/checklists`.
///
/// ```text
/// GET    /{entity_id}?module=&entity_type=&process_id=  -> execution_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{entity_id}", get(checklists::execution_view))
}
