//! Route definitions for briefs and everything hanging off a brief.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{briefs, canvas, locks, snapshots};
use crate::state::AppState;

/// Brief routes mounted at `/briefs`.
///
/// ```text
/// POST   /                                  -> briefs::create
/// GET    /                                  -> briefs::list
/// GET    /{id}                              -> briefs::get_by_id
/// PATCH  /{id}                              -> briefs::update
/// POST   /{id}/publish                      -> briefs::publish
/// POST   /{id}/lock                         -> locks::acquire
/// GET    /{id}/lock                         -> locks::status
/// DELETE /{id}/lock                         -> locks::release
/// POST   /{id}/lock/heartbeat               -> locks::heartbeat
/// GET    /{id}/canvas                       -> canvas::get_state
/// PATCH  /{id}/canvas                       -> canvas::apply_ops
/// POST   /{id}/snapshots                    -> snapshots::create
/// GET    /{id}/snapshots                    -> snapshots::list
/// GET    /{id}/snapshots/{sid}              -> snapshots::get_by_id
/// POST   /{id}/snapshots/{sid}/restore      -> snapshots::restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(briefs::list).post(briefs::create))
        .route("/{id}", get(briefs::get_by_id).patch(briefs::update))
        .route("/{id}/publish", post(briefs::publish))
        .route(
            "/{id}/lock",
            post(locks::acquire)
                .get(locks::status)
                .delete(locks::release),
        )
        .route("/{id}/lock/heartbeat", post(locks::heartbeat))
        .route(
            "/{id}/canvas",
            get(canvas::get_state).patch(canvas::apply_ops),
        )
        .route(
            "/{id}/snapshots",
            post(snapshots::create).get(snapshots::list),
        )
        .route("/{id}/snapshots/{sid}", get(snapshots::get_by_id))
        .route("/{id}/snapshots/{sid}/restore", post(snapshots::restore))
}
