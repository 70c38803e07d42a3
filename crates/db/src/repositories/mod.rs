//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that must also run inside the canvas transaction take any
//! [`sqlx::PgExecutor`] instead of `&PgPool`.

pub mod block_repo;
pub mod brief_lock_repo;
pub mod brief_repo;
pub mod canvas_repo;
pub mod page_repo;
pub mod project_repo;
pub mod snapshot_repo;

pub use block_repo::BlockRepo;
pub use brief_lock_repo::BriefLockRepo;
pub use brief_repo::BriefRepo;
pub use canvas_repo::{AppliedBatch, CanvasError, CanvasRepo};
pub use page_repo::PageRepo;
pub use project_repo::ProjectRepo;
pub use snapshot_repo::SnapshotRepo;
