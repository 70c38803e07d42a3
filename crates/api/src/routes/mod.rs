pub mod briefs;
pub mod health;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy (all require a Bearer token):
///
/// ```text
/// /projects                                   create, list (caller's)
///
/// /briefs                                     create, list (?project_id=)
/// /briefs/{id}                                get, update
/// /briefs/{id}/publish                        draft -> ready (POST)
/// /briefs/{id}/lock                           acquire (POST), status (GET), release (DELETE)
/// /briefs/{id}/lock/heartbeat                 extend (POST)
/// /briefs/{id}/canvas                         state (GET), apply ops (PATCH)
/// /briefs/{id}/snapshots                      create (POST), list (GET)
/// /briefs/{id}/snapshots/{sid}                get with data
/// /briefs/{id}/snapshots/{sid}/restore        restore (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", projects::router())
        .nest("/briefs", briefs::router())
}
