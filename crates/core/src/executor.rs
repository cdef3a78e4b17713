//! The single writer of category membership.
//!
//! The store cannot move a video between two category documents atomically,
//! so a transfer is an ordered read-modify-write sequence:
//!
//! 1. no-op intents return the current snapshot without touching the store
//! 2. fetch the video record by id
//! 3. fetch the target category fresh from the store
//! 4. append the video to the target and write the target document
//! 5. fetch the source category fresh, remove the video, write it back
//! 6. reload the membership snapshot
//!
//! The target is always written before the source. If the sequence stops
//! between 4 and 5 the video is left in both categories, never in neither.
//! Completed writes are not rolled back on failure.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CoreError, StoreError, TransferStage};
use crate::membership::{MembershipModel, Snapshot};
use crate::store::RemoteStore;
use crate::transfer::TransferIntent;
use crate::types::EntityId;

/// What a successful `execute` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferOutcome {
    /// The video was written into its new location.
    Applied,
    /// Source and target were the same; no store call was made.
    NoOp,
    /// The target already listed the video, so it was not written again.
    /// Removal from the source still ran.
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct TransferReport {
    pub intent: TransferIntent,
    pub outcome: TransferOutcome,
    /// Snapshot reloaded after the transfer (the unchanged one for no-ops).
    pub snapshot: Arc<Snapshot>,
}

/// Async mutex per category id.
///
/// Transfers touching a common category run one after another; transfers on
/// disjoint categories still interleave freely.
#[derive(Default)]
struct CategoryLocks {
    locks: Mutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl CategoryLocks {
    /// Lock every id in `ids`, always in sorted order so two transfers over
    /// the same pair of categories cannot deadlock.
    async fn acquire(&self, ids: &[&str]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids: Vec<&str> = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let handles: Vec<Arc<Mutex<()>>> = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            ids.iter()
                .map(|id| Arc::clone(locks.entry((*id).to_string()).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        guards
    }
}

pub struct TransferExecutor {
    store: Arc<dyn RemoteStore>,
    membership: Arc<MembershipModel>,
    locks: Option<CategoryLocks>,
}

impl TransferExecutor {
    pub fn new(store: Arc<dyn RemoteStore>, membership: Arc<MembershipModel>) -> Self {
        Self {
            store,
            membership,
            locks: None,
        }
    }

    /// Queue transfers per category: a transfer waits until no other
    /// transfer touching its source or target is in flight.
    pub fn with_category_queue(mut self) -> Self {
        self.locks = Some(CategoryLocks::default());
        self
    }

    /// Apply `intent` to the store and reload the snapshot.
    ///
    /// Failures are reported as [`CoreError::TransferFailed`] naming the
    /// stage that failed; writes from earlier stages remain in the store.
    pub async fn execute(&self, intent: TransferIntent) -> Result<TransferReport, CoreError> {
        if intent.is_no_op() {
            tracing::debug!(video_id = %intent.video_id, "No-op transfer, store untouched");
            return Ok(TransferReport {
                intent,
                outcome: TransferOutcome::NoOp,
                snapshot: self.membership.snapshot(),
            });
        }

        let _guards = match &self.locks {
            Some(locks) => {
                let ids: Vec<&str> = intent
                    .source_category_id
                    .iter()
                    .chain(intent.target_category_id.iter())
                    .map(String::as_str)
                    .collect();
                locks.acquire(&ids).await
            }
            None => Vec::new(),
        };

        match self.run(&intent).await {
            Ok((outcome, snapshot)) => {
                tracing::info!(
                    video_id = %intent.video_id,
                    source = ?intent.source_category_id,
                    target = ?intent.target_category_id,
                    kind = %intent.kind(),
                    ?outcome,
                    "Transfer completed",
                );
                Ok(TransferReport {
                    intent,
                    outcome,
                    snapshot,
                })
            }
            Err(err) => {
                tracing::warn!(
                    video_id = %intent.video_id,
                    source = ?intent.source_category_id,
                    target = ?intent.target_category_id,
                    error = %err,
                    "Transfer failed",
                );
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        intent: &TransferIntent,
    ) -> Result<(TransferOutcome, Arc<Snapshot>), CoreError> {
        let video = self
            .store
            .get_video(&intent.video_id)
            .await
            .map_err(at(TransferStage::VideoFetch))?;

        let mut outcome = TransferOutcome::Applied;

        if let Some(target_id) = &intent.target_category_id {
            let mut target = self
                .store
                .get_category(target_id)
                .await
                .map_err(at(TransferStage::TargetFetch))?;

            if target.append_video(video) {
                self.store
                    .update_category(target_id, &target)
                    .await
                    .map_err(at(TransferStage::TargetUpdate))?;
                tracing::debug!(video_id = %intent.video_id, category_id = %target_id, "Target written");
            } else {
                outcome = TransferOutcome::AlreadyPresent;
                tracing::debug!(
                    video_id = %intent.video_id,
                    category_id = %target_id,
                    "Target already lists video, skipping write",
                );
            }
        }

        if let Some(source_id) = &intent.source_category_id {
            let mut source = self
                .store
                .get_category(source_id)
                .await
                .map_err(at(TransferStage::SourceFetch))?;

            if source.remove_video(&intent.video_id) {
                self.store
                    .update_category(source_id, &source)
                    .await
                    .map_err(at(TransferStage::SourceUpdate))?;
                tracing::debug!(video_id = %intent.video_id, category_id = %source_id, "Source written");
            }
        }

        let snapshot = self
            .membership
            .reload()
            .await
            .map_err(at(TransferStage::Reload))?;

        Ok((outcome, snapshot))
    }
}

fn at(stage: TransferStage) -> impl FnOnce(StoreError) -> CoreError {
    move |cause| CoreError::TransferFailed { stage, cause }
}
