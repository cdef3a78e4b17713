//! Vidshelf domain core.
//!
//! Holds the video/category data model and the engine that keeps category
//! membership in sync with a remote document store:
//!
//! - [`membership`]: the last-fetched snapshot of all categories and the
//!   derived unassigned pool.
//! - [`transfer`]: drag payloads and validated transfer intents.
//! - [`executor`]: the single writer of membership state.
//! - [`store`]: the [`store::RemoteStore`] collaborator contract plus an
//!   in-memory implementation.

pub mod embed;
pub mod error;
pub mod executor;
pub mod membership;
pub mod model;
pub mod store;
pub mod transfer;
pub mod types;
pub mod views;
