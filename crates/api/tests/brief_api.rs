//! HTTP-level tests for projects, briefs, and the publish transition.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_brief, get, patch_json, post, post_json, ALICE, BOB};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/projects", ALICE, json!({"name": "Rebrand"})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Rebrand");
    assert_eq!(json["owner_id"], ALICE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_name_is_validated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/projects", ALICE, json!({"name": ""})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_projects_are_listed_per_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/projects", ALICE, json!({"name": "Mine"})).await;
    post_json(app.clone(), "/api/projects", BOB, json!({"name": "Theirs"})).await;

    let json = body_json(get(app, "/api/projects", ALICE).await).await;
    let projects = json.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Mine");
}

// ---------------------------------------------------------------------------
// Briefs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_brief_starts_as_draft(pool: PgPool) {
    let app = common::build_test_app(pool);
    let brief_id = create_brief(&app, ALICE).await;

    let response = get(app, &format!("/api/briefs/{brief_id}"), ALICE).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "draft");
    assert_eq!(json["created_by"], ALICE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_brief_for_missing_project_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/briefs",
        ALICE,
        json!({"project_id": 999999, "title": "Orphan"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_and_update_briefs(pool: PgPool) {
    let app = common::build_test_app(pool);
    let brief_id = create_brief(&app, ALICE).await;
    let brief = body_json(get(app.clone(), &format!("/api/briefs/{brief_id}"), ALICE).await).await;
    let project_id = brief["project_id"].as_i64().unwrap();

    let response = patch_json(
        app.clone(),
        &format!("/api/briefs/{brief_id}"),
        ALICE,
        json!({"description": "Audience: new parents"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Launch brief");
    assert_eq!(updated["description"], "Audience: new parents");

    let list = body_json(get(app, &format!("/api/briefs?project_id={project_id}"), ALICE).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_brief_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/briefs/424242", ALICE).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_flips_status_once(pool: PgPool) {
    let app = common::build_test_app(pool);
    let brief_id = create_brief(&app, ALICE).await;
    let uri = format!("/api/briefs/{brief_id}/publish");

    let response = post(app.clone(), &uri, ALICE).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({"success": true, "status": "ready"}));

    let again = post(app.clone(), &uri, ALICE).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "INVALID_STATE");

    let brief = body_json(get(app, &format!("/api/briefs/{brief_id}"), ALICE).await).await;
    assert_eq!(brief["status"], "ready");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_missing_brief_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post(app, "/api/briefs/31337/publish", ALICE).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_does_not_need_lock(pool: PgPool) {
    let app = common::build_test_app(pool);
    let brief_id = create_brief(&app, ALICE).await;
    common::acquire_lock(&app, brief_id, ALICE).await;

    // Someone else can publish while ALICE holds the lock.
    let response = post(app, &format!("/api/briefs/{brief_id}/publish"), BOB).await;
    assert_eq!(response.status(), StatusCode::OK);
}
