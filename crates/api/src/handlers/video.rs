//! Handlers for the video catalog and the viewing history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vidshelf_core::model::{HistoryEntry, NewVideo};
use vidshelf_core::views::PoolView;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/videos
pub async fn list_videos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let videos = state.store.list_videos().await?;

    Ok(Json(DataResponse { data: videos }))
}

/// GET /api/v1/videos/unassigned
///
/// The pool: every video no category lists, judged against the last loaded
/// membership snapshot.
pub async fn list_unassigned(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.snapshot().await?;
    let videos = state.store.list_videos().await?;

    Ok(Json(DataResponse {
        data: PoolView::project(&snapshot, &videos),
    }))
}

/// POST /api/v1/videos
///
/// Validates the form fields and derives the embed link from the pasted URL.
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<NewVideo>,
) -> AppResult<impl IntoResponse> {
    let video = input.into_video()?;
    let created = state.store.create_video(&video).await?;

    tracing::info!(video_id = %created.id, title = %created.title, "Video added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// DELETE /api/v1/videos/{id}
///
/// Removes the catalog entry only. Copies embedded in categories stay.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.store.delete_video(&video_id).await?;

    tracing::info!(video_id = %video_id, "Video deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// POST /api/v1/videos/{id}/views
///
/// Record that the video was opened for playback.
pub async fn record_view(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let video = state.store.get_video(&video_id).await?;
    let entry = state
        .store
        .append_history(&HistoryEntry::viewed(&video, chrono::Utc::now()))
        .await?;

    tracing::debug!(video_id = %video_id, "View recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/history
pub async fn list_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let history = state.store.list_history().await?;

    Ok(Json(DataResponse { data: history }))
}
