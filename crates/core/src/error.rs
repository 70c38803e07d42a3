use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another holder owns a live lock on the resource.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The presented lock token does not match the live lock, or the lock expired.
    #[error("Invalid lock: {0}")]
    InvalidLock(String),

    /// The operation is not allowed in the entity's current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
