//! Canvas op vocabulary, validation, and planning.
//!
//! Clients send batches of ops as `{ "type": "<op>", "payload": { ... } }`.
//! [`plan_ops`] validates an entire batch before anything touches the
//! database and lowers each op into a [`PlannedOp`] whose create/update
//! split is explicit, so the repository layer only has to execute it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Autosave cadence echoed to clients, in milliseconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 1_500;

/// Default maximum number of ops accepted in one batch.
pub const DEFAULT_MAX_BATCH: usize = 50;

/// Upper bound for a configured batch limit.
pub const MAX_MAX_BATCH: usize = 500;

/// Maximum length of a page title, in characters.
pub const MAX_PAGE_TITLE_LENGTH: usize = 200;

/// Known block types.
pub mod block_types {
    pub const TEXT: &str = "text";
    pub const IMAGE: &str = "image";
    pub const CAPTURE_REF: &str = "capture_ref";
    pub const NOTE: &str = "note";
    pub const SHAPE: &str = "shape";

    /// All recognised block types.
    pub const ALL: &[&str] = &[TEXT, IMAGE, CAPTURE_REF, NOTE, SHAPE];
}

/// Returns `true` if the given block type is recognised.
pub fn is_valid_block_type(block_type: &str) -> bool {
    block_types::ALL.contains(&block_type)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One client-submitted canvas operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CanvasOp {
    UpsertPage(PageUpsert),
    UpsertBlock(BlockUpsert),
    DeletePage(EntityRef),
    DeleteBlock(EntityRef),
    ReorderPages(PageReorder),
}

impl CanvasOp {
    pub fn name(&self) -> &'static str {
        match self {
            CanvasOp::UpsertPage(_) => "upsert_page",
            CanvasOp::UpsertBlock(_) => "upsert_block",
            CanvasOp::DeletePage(_) => "delete_page",
            CanvasOp::DeleteBlock(_) => "delete_block",
            CanvasOp::ReorderPages(_) => "reorder_pages",
        }
    }
}

/// Payload of `upsert_page`. Without `id` a page is created and both `title`
/// and `index_no` are required; with `id` only the given fields change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageUpsert {
    pub id: Option<DbId>,
    pub title: Option<String>,
    pub index_no: Option<i32>,
}

/// Payload of `upsert_block`. Without `id` a block is created and `type`,
/// `x`, `y`, `w`, `h` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockUpsert {
    pub id: Option<DbId>,
    pub page_id: Option<DbId>,
    #[serde(rename = "type")]
    pub block_type: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub z: Option<i32>,
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: DbId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReorder {
    pub pages: Vec<PageOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOrder {
    pub id: DbId,
    pub index_no: i32,
}

/// Kind tag of a per-op result entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpResultKind {
    PageCreated,
    PageUpdated,
    PageDeleted,
    BlockCreated,
    BlockUpdated,
    BlockDeleted,
    PagesReordered,
}

// ---------------------------------------------------------------------------
// Planned ops
// ---------------------------------------------------------------------------

/// Fields of a block being created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    /// `None` places the block on the brief's first page.
    pub page_id: Option<DbId>,
    pub block_type: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub z: i32,
    pub content: serde_json::Value,
}

/// Partial update of an existing block; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockPatch {
    pub page_id: Option<DbId>,
    pub block_type: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub z: Option<i32>,
    pub content: Option<serde_json::Value>,
}

/// A validated op, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedOp {
    CreatePage {
        title: String,
        index_no: i32,
    },
    UpdatePage {
        id: DbId,
        title: Option<String>,
        index_no: Option<i32>,
    },
    DeletePage {
        id: DbId,
    },
    CreateBlock(NewBlock),
    UpdateBlock {
        id: DbId,
        patch: BlockPatch,
    },
    DeleteBlock {
        id: DbId,
    },
    ReorderPages {
        pages: Vec<PageOrder>,
    },
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Decode raw JSON ops one by one so a malformed entry is reported by index.
pub fn decode_ops(raw: Vec<serde_json::Value>) -> Result<Vec<CanvasOp>, CoreError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|e| CoreError::Validation(format!("op #{index}: malformed op: {e}")))
        })
        .collect()
}

/// Validate a whole batch and lower it to [`PlannedOp`]s, preserving order.
///
/// Fails on the first invalid op; the error message names its index.
pub fn plan_ops(ops: Vec<CanvasOp>, max_batch: usize) -> Result<Vec<PlannedOp>, CoreError> {
    if ops.len() > max_batch {
        return Err(CoreError::Validation(format!(
            "Batch contains {} ops, the limit is {max_batch}",
            ops.len()
        )));
    }

    ops.into_iter()
        .enumerate()
        .map(|(index, op)| {
            let name = op.name();
            plan_op(op).map_err(|msg| {
                CoreError::Validation(format!("op #{index} ({name}): {msg}"))
            })
        })
        .collect()
}

fn plan_op(op: CanvasOp) -> Result<PlannedOp, String> {
    match op {
        CanvasOp::UpsertPage(page) => plan_page(page),
        CanvasOp::UpsertBlock(block) => plan_block(block),
        CanvasOp::DeletePage(EntityRef { id }) => {
            validate_id("id", id)?;
            Ok(PlannedOp::DeletePage { id })
        }
        CanvasOp::DeleteBlock(EntityRef { id }) => {
            validate_id("id", id)?;
            Ok(PlannedOp::DeleteBlock { id })
        }
        CanvasOp::ReorderPages(PageReorder { pages }) => {
            if pages.is_empty() {
                return Err("pages must not be empty".into());
            }
            let mut seen = HashSet::with_capacity(pages.len());
            for entry in &pages {
                validate_id("pages[].id", entry.id)?;
                validate_index_no(entry.index_no)?;
                if !seen.insert(entry.id) {
                    return Err(format!("page {} is listed more than once", entry.id));
                }
            }
            Ok(PlannedOp::ReorderPages { pages })
        }
    }
}

fn plan_page(page: PageUpsert) -> Result<PlannedOp, String> {
    if let Some(title) = &page.title {
        validate_page_title(title)?;
    }
    if let Some(index_no) = page.index_no {
        validate_index_no(index_no)?;
    }

    match page.id {
        Some(id) => {
            validate_id("id", id)?;
            Ok(PlannedOp::UpdatePage {
                id,
                title: page.title,
                index_no: page.index_no,
            })
        }
        None => {
            let title = page.title.ok_or("title is required when creating a page")?;
            let index_no = page
                .index_no
                .ok_or("index_no is required when creating a page")?;
            Ok(PlannedOp::CreatePage { title, index_no })
        }
    }
}

fn plan_block(block: BlockUpsert) -> Result<PlannedOp, String> {
    if let Some(page_id) = block.page_id {
        validate_id("page_id", page_id)?;
    }
    if let Some(block_type) = &block.block_type {
        validate_block_type(block_type)?;
    }
    for (field, value) in [("x", block.x), ("y", block.y)] {
        if let Some(v) = value {
            validate_coordinate(field, v)?;
        }
    }
    for (field, value) in [("w", block.w), ("h", block.h)] {
        if let Some(v) = value {
            validate_extent(field, v)?;
        }
    }
    if let Some(content) = &block.content {
        if !content.is_object() {
            return Err("content must be a JSON object".into());
        }
    }

    match block.id {
        Some(id) => {
            validate_id("id", id)?;
            Ok(PlannedOp::UpdateBlock {
                id,
                patch: BlockPatch {
                    page_id: block.page_id,
                    block_type: block.block_type,
                    x: block.x,
                    y: block.y,
                    w: block.w,
                    h: block.h,
                    z: block.z,
                    content: block.content,
                },
            })
        }
        None => Ok(PlannedOp::CreateBlock(NewBlock {
            page_id: block.page_id,
            block_type: block
                .block_type
                .ok_or("type is required when creating a block")?,
            x: block.x.ok_or("x is required when creating a block")?,
            y: block.y.ok_or("y is required when creating a block")?,
            w: block.w.ok_or("w is required when creating a block")?,
            h: block.h.ok_or("h is required when creating a block")?,
            z: block.z.unwrap_or(0),
            content: block
                .content
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        })),
    }
}

fn validate_id(field: &str, id: DbId) -> Result<(), String> {
    if id <= 0 {
        return Err(format!("{field} must be positive, got {id}"));
    }
    Ok(())
}

fn validate_index_no(index_no: i32) -> Result<(), String> {
    if index_no < 0 {
        return Err(format!("index_no must be non-negative, got {index_no}"));
    }
    Ok(())
}

fn validate_page_title(title: &str) -> Result<(), String> {
    let len = title.chars().count();
    if len > MAX_PAGE_TITLE_LENGTH {
        return Err(format!(
            "title must be at most {MAX_PAGE_TITLE_LENGTH} characters, got {len}"
        ));
    }
    Ok(())
}

fn validate_block_type(block_type: &str) -> Result<(), String> {
    if !is_valid_block_type(block_type) {
        return Err(format!(
            "invalid block type '{block_type}'. Must be one of: {}",
            block_types::ALL.join(", ")
        ));
    }
    Ok(())
}

fn validate_coordinate(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{field} must be a finite number"));
    }
    Ok(())
}

fn validate_extent(field: &str, value: f64) -> Result<(), String> {
    validate_coordinate(field, value)?;
    if value < 0.0 {
        return Err(format!("{field} must be non-negative, got {value}"));
    }
    Ok(())
}

/// Validate a configured batch limit.
pub fn validate_max_batch(max_batch: usize) -> Result<(), String> {
    if max_batch == 0 || max_batch > MAX_MAX_BATCH {
        return Err(format!(
            "Batch limit must be between 1 and {MAX_MAX_BATCH}, got {max_batch}"
        ));
    }
    Ok(())
}
