pub mod category;
pub mod health;
pub mod video;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                         membership snapshot feed (WebSocket)
///
/// /videos                     list, create
/// /videos/unassigned          the pool
/// /videos/{id}                delete
/// /videos/{id}/views          record a view (POST)
///
/// /categories                 list (reloads snapshot), create
/// /categories/{id}            get, delete
/// /board                      pool plus categories
///
/// /drags                      start a drag (POST)
/// /transfers                  drop a dragged card (POST)
///
/// /history                    viewing history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/videos", video::router())
        .nest("/categories", category::router())
        .route("/board", get(handlers::category::get_board))
        .route("/drags", post(handlers::transfer::begin_drag))
        .route("/transfers", post(handlers::transfer::create_transfer))
        .route("/history", get(handlers::video::list_history))
}
