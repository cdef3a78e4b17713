//! Live membership feed.
//!
//! Each connection receives the current snapshot on connect and the full
//! replacement snapshot after every reload, as
//! `{"type": "snapshot", "data": {...}}` text frames.

mod handler;

pub use handler::ws_handler;
