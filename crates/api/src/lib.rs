//! HTTP surface for the video shelf: catalog CRUD, drag-and-drop transfers,
//! viewing history and a live membership feed.
//!
//! The binary in `main.rs` and the integration tests both build the app
//! through [`router::build_app_router`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
