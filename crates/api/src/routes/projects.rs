use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Project routes mounted at `/projects`.
///
/// ```text
/// POST /    -> create
/// GET  /    -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(projects::list).post(projects::create))
}
