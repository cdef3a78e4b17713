use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

/// Video routes mounted at `/videos`.
///
/// ```text
/// GET    /                -> list_videos
/// POST   /                -> create_video
/// GET    /unassigned      -> list_unassigned
/// DELETE /{id}            -> delete_video
/// POST   /{id}/views      -> record_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(video::list_videos).post(video::create_video))
        .route("/unassigned", get(video::list_unassigned))
        .route("/{id}", delete(video::delete_video))
        .route("/{id}/views", post(video::record_view))
}
