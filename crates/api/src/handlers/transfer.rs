//! Handlers for the drag-and-drop transfer protocol.
//!
//! A drag starts with `POST /drags`, which hands the client the encoded
//! payload to carry in the drag event. The drop posts that payload back to
//! `POST /transfers` together with the category it landed on (absent for the
//! unassigned pool).

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use vidshelf_core::executor::TransferOutcome;
use vidshelf_core::transfer::{DragPayload, TransferIntent};
use vidshelf_core::types::{flexible_id, EntityId};
use vidshelf_core::views::CategoryView;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/drags`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginDragRequest {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub video_id: EntityId,
    /// Category the card was picked up from; absent for the pool.
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub source_category_id: Option<EntityId>,
}

#[derive(Debug, Serialize)]
pub struct DragStarted {
    /// Opaque string to put in the drag event's data transfer.
    pub payload: String,
    #[serde(flatten)]
    pub drag: DragPayload,
}

/// The drag payload as dropped: either the encoded string or the decoded
/// object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DroppedPayload {
    Encoded(String),
    Decoded(DragPayload),
}

impl DroppedPayload {
    fn into_payload(self) -> AppResult<DragPayload> {
        match self {
            DroppedPayload::Encoded(raw) => Ok(DragPayload::decode(&raw)?),
            DroppedPayload::Decoded(payload) => Ok(payload),
        }
    }
}

/// Request body for `POST /api/v1/transfers`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub payload: DroppedPayload,
    /// Category the card was dropped on; absent or `null` for the pool.
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub target_category_id: Option<EntityId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub outcome: TransferOutcome,
    pub kind: String,
    pub intent: TransferIntent,
    /// Categories as reloaded after the transfer.
    pub categories: Vec<CategoryView>,
}

/// POST /api/v1/drags
pub async fn begin_drag(
    State(state): State<AppState>,
    Json(input): Json<BeginDragRequest>,
) -> AppResult<impl IntoResponse> {
    let drag = state
        .protocol
        .begin_drag(&input.video_id, input.source_category_id.as_deref());
    let payload = drag.encode()?;

    Ok(Json(DataResponse {
        data: DragStarted { payload, drag },
    }))
}

/// POST /api/v1/transfers
///
/// Unsupported drops are rejected with 422 before the store is touched.
/// A failure part-way returns 502 naming the failed stage; earlier writes
/// stay in place and the same drop can be retried.
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(input): Json<TransferRequest>,
) -> AppResult<impl IntoResponse> {
    let payload = input.payload.into_payload()?;
    let intent = state
        .protocol
        .complete_drag(&payload, input.target_category_id.as_deref())?;

    // Detached so a request timeout or client disconnect cannot stop a
    // transfer between its target and source writes.
    let executor = Arc::clone(&state.executor);
    let report = tokio::spawn(async move { executor.execute(intent).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Transfer task failed: {e}")))??;

    Ok(Json(DataResponse {
        data: TransferResponse {
            outcome: report.outcome,
            kind: report.intent.kind().to_string(),
            categories: CategoryView::project_all(&report.snapshot),
            intent: report.intent,
        },
    }))
}
