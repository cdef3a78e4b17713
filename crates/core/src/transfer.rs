//! Drag gestures and the transfer intents they produce.
//!
//! A gesture starts with [`TransferProtocol::begin_drag`], which captures the
//! dragged video and where it currently lives into a [`DragPayload`]. The
//! payload travels with the platform's drag event (see
//! [`DragPayload::encode`]) and is turned into a [`TransferIntent`] by
//! [`TransferProtocol::complete_drag`] at the drop target. Nothing here is
//! stored between gestures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{flexible_id, EntityId};

/// Subject and origin of an in-flight drag gesture.
///
/// `source_category_id == None` means the video was picked up from the
/// unassigned pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(rename = "videoId", deserialize_with = "flexible_id::deserialize")]
    pub video_id: EntityId,
    #[serde(
        rename = "categoryId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flexible_id::option::deserialize"
    )]
    pub source_category_id: Option<EntityId>,
}

impl DragPayload {
    /// JSON form carried in the drag event's data transfer.
    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Internal(e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Malformed drag payload: {e}")))
    }
}

/// The shape of a transfer, derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    PoolToCategory,
    CategoryToCategory,
    CategoryToPool,
    NoOp,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferKind::PoolToCategory => "pool-to-category",
            TransferKind::CategoryToCategory => "category-to-category",
            TransferKind::CategoryToPool => "category-to-pool",
            TransferKind::NoOp => "no-op",
        })
    }
}

/// A validated request to move one video. `None` on either side is the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferIntent {
    pub video_id: EntityId,
    pub source_category_id: Option<EntityId>,
    pub target_category_id: Option<EntityId>,
    no_op: bool,
}

impl TransferIntent {
    /// Source and target are the same place; executing it touches nothing.
    pub fn is_no_op(&self) -> bool {
        self.no_op
    }

    pub fn kind(&self) -> TransferKind {
        if self.no_op {
            return TransferKind::NoOp;
        }
        match (&self.source_category_id, &self.target_category_id) {
            (None, Some(_)) => TransferKind::PoolToCategory,
            (Some(_), Some(_)) => TransferKind::CategoryToCategory,
            (Some(_), None) => TransferKind::CategoryToPool,
            (None, None) => TransferKind::NoOp,
        }
    }
}

/// Builds transfer intents from drag gestures.
#[derive(Debug, Clone, Copy)]
pub struct TransferProtocol {
    pool_drop_target: bool,
}

impl TransferProtocol {
    /// `pool_drop_target` states whether the view exposes the unassigned
    /// pool as a drop area. Without one, videos cannot leave a category.
    pub fn new(pool_drop_target: bool) -> Self {
        Self { pool_drop_target }
    }

    pub fn begin_drag(&self, video_id: &str, source_category_id: Option<&str>) -> DragPayload {
        DragPayload {
            video_id: video_id.to_string(),
            source_category_id: source_category_id.map(str::to_string),
        }
    }

    /// Turn a dropped payload into an intent.
    ///
    /// Rejections happen here, before any store call:
    /// - empty video or category ids
    /// - dropping onto the pool when no pool drop target is exposed
    ///
    /// Dropping onto the card's own location yields a no-op intent.
    pub fn complete_drag(
        &self,
        payload: &DragPayload,
        target_category_id: Option<&str>,
    ) -> Result<TransferIntent, CoreError> {
        if payload.video_id.trim().is_empty() {
            return Err(CoreError::UnsupportedTransfer(
                "Drag payload carries no video id".to_string(),
            ));
        }
        if payload.source_category_id.as_deref() == Some("") || target_category_id == Some("") {
            return Err(CoreError::UnsupportedTransfer(
                "Category id must not be empty".to_string(),
            ));
        }

        let source = payload.source_category_id.clone();
        let target = target_category_id.map(str::to_string);
        let no_op = source == target;

        if !no_op && target.is_none() && !self.pool_drop_target {
            return Err(CoreError::UnsupportedTransfer(format!(
                "Video {} cannot be moved out of a category: no pool drop target",
                payload.video_id
            )));
        }

        Ok(TransferIntent {
            video_id: payload.video_id.clone(),
            source_category_id: source,
            target_category_id: target,
            no_op,
        })
    }
}

impl Default for TransferProtocol {
    fn default() -> Self {
        Self::new(true)
    }
}
