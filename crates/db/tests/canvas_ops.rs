//! Integration tests for batched canvas writes and snapshot restore.
//!
//! - Batches apply in order and report one result per op
//! - A failing op rolls back the whole batch
//! - Writes require the live lock token and a draft brief
//! - Snapshots are immutable and restore replaces the graph

use assert_matches::assert_matches;
use radar_core::canvas::{plan_ops, CanvasOp, OpResultKind, PlannedOp, DEFAULT_MAX_BATCH};
use radar_core::error::CoreError;
use radar_core::lock::{generate_lock_token, DEFAULT_LOCK_TTL_SECS};
use radar_db::models::brief::CreateBrief;
use radar_db::models::project::CreateProject;
use radar_db::repositories::{
    BriefLockRepo, BriefRepo, CanvasError, CanvasRepo, ProjectRepo, SnapshotRepo,
};
use serde_json::json;
use sqlx::PgPool;

const OWNER: i64 = 7;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_brief(pool: &PgPool) -> i64 {
    let project = ProjectRepo::create(
        pool,
        OWNER,
        &CreateProject {
            name: "Launch".to_string(),
        },
    )
    .await
    .unwrap();
    BriefRepo::create(
        pool,
        &CreateBrief {
            project_id: project.id,
            title: "Hero layout".to_string(),
            description: Some("First pass".to_string()),
        },
        OWNER,
    )
    .await
    .unwrap()
    .id
}

/// Acquire the brief's lock for `OWNER`, returning the plaintext token.
async fn lock(pool: &PgPool, brief_id: i64) -> String {
    let token = generate_lock_token();
    BriefLockRepo::acquire(pool, brief_id, OWNER, &token.hash, DEFAULT_LOCK_TTL_SECS)
        .await
        .unwrap()
        .unwrap();
    token.plaintext
}

fn ops(value: serde_json::Value) -> Vec<PlannedOp> {
    let ops: Vec<CanvasOp> = serde_json::from_value(value).unwrap();
    plan_ops(ops, DEFAULT_MAX_BATCH).unwrap()
}

async fn count(pool: &PgPool, table: &str, brief_id: i64) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE brief_id = $1"))
        .bind(brief_id)
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

// ---------------------------------------------------------------------------
// Batch apply
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_applies_in_order(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;

    let applied = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_page", "payload": {"title": "Cover", "index_no": 0}},
            {"type": "upsert_block", "payload": {"type": "text", "x": 10, "y": 20, "w": 300, "h": 80,
                "content": {"text": "Hello"}}}
        ])),
    )
    .await
    .unwrap();

    assert_eq!(applied.results.len(), 2);
    assert_eq!(applied.results[0].kind, OpResultKind::PageCreated);
    assert_eq!(applied.results[1].kind, OpResultKind::BlockCreated);

    // The page-less block landed on the page created earlier in the batch.
    let page_id = applied.results[0].data["id"].as_i64().unwrap();
    assert_eq!(applied.results[1].data["page_id"].as_i64().unwrap(), page_id);
    assert_eq!(applied.results[1].data["type"], "text");

    let graph = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    assert_eq!(graph.pages.len(), 1);
    assert_eq!(graph.blocks.len(), 1);
    assert_eq!(graph.blocks[0].content, json!({"text": "Hello"}));

    let brief = BriefRepo::find_by_id(&pool, brief_id).await.unwrap().unwrap();
    assert_eq!(brief.updated_at, applied.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failing_op_rolls_back_whole_batch(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;

    let err = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_page", "payload": {"title": "Cover", "index_no": 0}},
            {"type": "delete_block", "payload": {"id": 999999}}
        ])),
    )
    .await
    .unwrap_err();

    assert_matches!(
        err,
        CanvasError::Op {
            index: 1,
            source: CoreError::NotFound { entity: "Block", .. }
        }
    );
    assert_eq!(count(&pool, "brief_pages", brief_id).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_block_without_pages_is_rejected(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;

    let err = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_block", "payload": {"type": "note", "x": 0, "y": 0, "w": 10, "h": 10}}
        ])),
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        CanvasError::Op {
            index: 0,
            source: CoreError::Validation(_)
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_delete_and_reorder(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;

    let created = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_page", "payload": {"title": "A", "index_no": 0}},
            {"type": "upsert_page", "payload": {"title": "B", "index_no": 1}}
        ])),
    )
    .await
    .unwrap();
    let a = created.results[0].data["id"].as_i64().unwrap();
    let b = created.results[1].data["id"].as_i64().unwrap();

    let block = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_block", "payload": {"page_id": a, "type": "shape", "x": 1, "y": 2, "w": 3, "h": 4}}
        ])),
    )
    .await
    .unwrap();
    let block_id = block.results[0].data["id"].as_i64().unwrap();

    let applied = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_block", "payload": {"id": block_id, "page_id": b, "x": 50}},
            {"type": "upsert_page", "payload": {"id": a, "title": "A renamed"}},
            {"type": "reorder_pages", "payload": {"pages": [{"id": a, "index_no": 1}, {"id": b, "index_no": 0}]}}
        ])),
    )
    .await
    .unwrap();
    assert_eq!(applied.results[0].kind, OpResultKind::BlockUpdated);
    assert_eq!(applied.results[0].data["x"], 50.0);
    assert_eq!(applied.results[0].data["y"], 2.0);
    assert_eq!(applied.results[1].kind, OpResultKind::PageUpdated);
    assert_eq!(applied.results[2].kind, OpResultKind::PagesReordered);

    let graph = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    assert_eq!(graph.pages[0].id, b);
    assert_eq!(graph.pages[1].title, "A renamed");
    assert_eq!(graph.blocks[0].page_id, b);

    // Deleting a page takes its blocks with it.
    CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([{"type": "delete_page", "payload": {"id": b}}])),
    )
    .await
    .unwrap();
    assert_eq!(count(&pool, "brief_blocks", brief_id).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ids_from_other_briefs_are_not_found(pool: PgPool) {
    let first = seed_brief(&pool).await;
    let second = seed_brief(&pool).await;
    let first_token = lock(&pool, first).await;
    let second_token = lock(&pool, second).await;

    let created = CanvasRepo::apply_ops(
        &pool,
        first,
        &first_token,
        ops(json!([{"type": "upsert_page", "payload": {"title": "Mine", "index_no": 0}}])),
    )
    .await
    .unwrap();
    let page_id = created.results[0].data["id"].as_i64().unwrap();

    let err = CanvasRepo::apply_ops(
        &pool,
        second,
        &second_token,
        ops(json!([{"type": "delete_page", "payload": {"id": page_id}}])),
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        CanvasError::Op {
            source: CoreError::NotFound { entity: "Page", .. },
            ..
        }
    );
    assert_eq!(count(&pool, "brief_pages", first).await, 1);
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_token_is_invalid_lock(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    lock(&pool, brief_id).await;

    let err = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        "forged-token",
        ops(json!([{"type": "upsert_page", "payload": {"title": "X", "index_no": 0}}])),
    )
    .await
    .unwrap_err();
    assert_matches!(err, CanvasError::Core(CoreError::InvalidLock(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_released_token_is_invalid_lock(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = generate_lock_token();
    BriefLockRepo::acquire(&pool, brief_id, OWNER, &token.hash, DEFAULT_LOCK_TTL_SECS)
        .await
        .unwrap()
        .unwrap();
    BriefLockRepo::release(&pool, brief_id, &token.hash).await.unwrap();

    let err = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token.plaintext,
        ops(json!([{"type": "upsert_page", "payload": {"title": "X", "index_no": 0}}])),
    )
    .await
    .unwrap_err();
    assert_matches!(err, CanvasError::Core(CoreError::InvalidLock(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_brief_is_not_found(pool: PgPool) {
    let err = CanvasRepo::apply_ops(&pool, 424242, "anything", Vec::new())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CanvasError::Core(CoreError::NotFound { entity: "Brief", .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_brief_rejects_edits(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;

    assert!(BriefRepo::publish(&pool, brief_id).await.unwrap().is_some());
    assert!(BriefRepo::publish(&pool, brief_id).await.unwrap().is_none());

    let err = CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([{"type": "upsert_page", "payload": {"title": "Late", "index_no": 0}}])),
    )
    .await
    .unwrap_err();
    assert_matches!(err, CanvasError::Core(CoreError::InvalidState(_)));
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_snapshot_is_unaffected_by_later_edits(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;
    CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_page", "payload": {"title": "Cover", "index_no": 0}},
            {"type": "upsert_block", "payload": {"type": "text", "x": 0, "y": 0, "w": 100, "h": 40}}
        ])),
    )
    .await
    .unwrap();

    let graph = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    let snapshot = SnapshotRepo::create(&pool, brief_id, OWNER, "before edits", &graph)
        .await
        .unwrap();

    let page_id = graph.pages[0].id;
    CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([{"type": "delete_page", "payload": {"id": page_id}}])),
    )
    .await
    .unwrap();

    let stored = SnapshotRepo::find_by_id(&pool, brief_id, snapshot.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.data, snapshot.data);
    assert_eq!(stored.data["pages"].as_array().unwrap().len(), 1);
    assert_eq!(stored.data["blocks"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_snapshot_listing_is_newest_first(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let graph = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    for reason in ["one", "two", "three"] {
        SnapshotRepo::create(&pool, brief_id, OWNER, reason, &graph)
            .await
            .unwrap();
    }

    assert_eq!(SnapshotRepo::count_by_brief(&pool, brief_id).await.unwrap(), 3);
    let page = SnapshotRepo::list_by_brief(&pool, brief_id, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].reason, "three");
    assert_eq!(page[1].reason, "two");

    let rest = SnapshotRepo::list_by_brief(&pool, brief_id, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].reason, "one");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_replaces_graph(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;
    CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "upsert_page", "payload": {"title": "Original", "index_no": 0}},
            {"type": "upsert_block", "payload": {"type": "image", "x": 5, "y": 5, "w": 64, "h": 64,
                "content": {"url": "https://cdn.example.com/a.png"}}}
        ])),
    )
    .await
    .unwrap();
    let before = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    let snapshot = SnapshotRepo::create(&pool, brief_id, OWNER, "checkpoint", &before)
        .await
        .unwrap();

    CanvasRepo::apply_ops(
        &pool,
        brief_id,
        &token,
        ops(json!([
            {"type": "delete_page", "payload": {"id": before.pages[0].id}},
            {"type": "upsert_page", "payload": {"title": "Replacement", "index_no": 0}}
        ])),
    )
    .await
    .unwrap();

    CanvasRepo::restore_snapshot(&pool, brief_id, snapshot.id, &token)
        .await
        .unwrap();

    let after = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    assert_eq!(after.pages.len(), 1);
    assert_eq!(after.pages[0].id, before.pages[0].id);
    assert_eq!(after.pages[0].title, "Original");
    assert_eq!(after.blocks.len(), 1);
    assert_eq!(after.blocks[0].id, before.blocks[0].id);
    assert_eq!(after.blocks[0].content, before.blocks[0].content);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_requires_lock(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let graph = CanvasRepo::read_graph(&pool, brief_id).await.unwrap();
    let snapshot = SnapshotRepo::create(&pool, brief_id, OWNER, "empty", &graph)
        .await
        .unwrap();

    let err = CanvasRepo::restore_snapshot(&pool, brief_id, snapshot.id, "no-lock")
        .await
        .unwrap_err();
    assert_matches!(err, CanvasError::Core(CoreError::InvalidLock(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_unknown_snapshot_is_not_found(pool: PgPool) {
    let brief_id = seed_brief(&pool).await;
    let token = lock(&pool, brief_id).await;
    let err = CanvasRepo::restore_snapshot(&pool, brief_id, 31337, &token)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CanvasError::Core(CoreError::NotFound { entity: "Snapshot", .. })
    );
}
