//! Domain types, rules, and validation for the Brief Canvas backend.
//!
//! This crate performs no IO. The repository layer (`radar-db`) and the HTTP
//! layer (`radar-api`) both depend on it for ids, errors, the brief status
//! machine, lock token handling, and the canvas op vocabulary.

pub mod brief;
pub mod canvas;
pub mod error;
pub mod hashing;
pub mod lock;
pub mod snapshot;
pub mod types;
