//! Handlers for categories and the combined board.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vidshelf_core::model::NewCategory;
use vidshelf_core::views::{BoardView, CategoryView};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Reloads the membership snapshot from the store and lists every category.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.membership.load().await?;

    Ok(Json(DataResponse {
        data: CategoryView::project_all(&snapshot),
    }))
}

/// GET /api/v1/categories/{id}
///
/// Served from the current snapshot; no store call once one is loaded.
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.snapshot().await?;
    let category = snapshot.category_by_id(&category_id)?;

    Ok(Json(DataResponse {
        data: CategoryView::from(category),
    }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<impl IntoResponse> {
    let input = input.validated()?;
    let created = state.store.create_category(&input).await?;

    tracing::info!(category_id = %created.id, name = %created.category_name, "Category created");
    refresh_membership(&state).await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CategoryView::from(&created),
        }),
    ))
}

/// DELETE /api/v1/categories/{id}
///
/// Member videos fall back into the pool; the video documents are untouched.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.store.delete_category(&category_id).await?;

    tracing::info!(category_id = %category_id, "Category deleted");
    refresh_membership(&state).await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/board
///
/// Pool and categories from one fresh snapshot.
pub async fn get_board(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.membership.load().await?;
    let videos = state.store.list_videos().await?;

    Ok(Json(DataResponse {
        data: BoardView::project(&snapshot, &videos),
    }))
}

/// Reload after a catalog write. The write already succeeded, so a failed
/// reload is logged and the stale snapshot kept.
async fn refresh_membership(state: &AppState) {
    if let Err(e) = state.membership.load().await {
        tracing::warn!(error = %e, "Membership reload after catalog change failed");
    }
}
