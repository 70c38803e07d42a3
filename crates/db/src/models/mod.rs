//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs where the API accepts them

pub mod brief;
pub mod canvas;
pub mod lock;
pub mod project;
pub mod snapshot;
