//! HTTP client for the JSON document server holding the `videos`,
//! `categories` and `history` collections.
//!
//! [`HttpStore`] implements [`RemoteStore`](vidshelf_core::store::RemoteStore)
//! using the server's REST conventions: one resource per collection, one
//! sub-resource per document, whole-document `PUT` for updates.

pub mod client;

pub use client::{HttpStore, HttpStoreError};
