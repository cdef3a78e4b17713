//! Row structs for the collection tables.
//!
//! Each submodule contains a `FromRow` struct matching the table and its
//! conversion into the core document type.

pub mod category;
pub mod history;
pub mod video;
