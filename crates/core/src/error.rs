use std::fmt;

use crate::types::EntityId;

/// Errors reported by a [`RemoteStore`](crate::store::RemoteStore) implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found in store")]
    NotFound { entity: &'static str, id: EntityId },

    /// The store could not be reached (network, DNS, pool exhausted, ...).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store answered but refused the call.
    #[error("Store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The store answered with a document that does not match the data model.
    #[error("Malformed store document: {0}")]
    Decode(String),
}

/// The step of a transfer that failed. See [`crate::executor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStage {
    VideoFetch,
    TargetFetch,
    TargetUpdate,
    SourceFetch,
    SourceUpdate,
    Reload,
}

impl TransferStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStage::VideoFetch => "video-fetch",
            TransferStage::TargetFetch => "target-fetch",
            TransferStage::TargetUpdate => "target-update",
            TransferStage::SourceFetch => "source-fetch",
            TransferStage::SourceUpdate => "source-update",
            TransferStage::Reload => "reload",
        }
    }
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// The store could not be read (maps the store's transport failures).
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A drag gesture that the protocol does not allow. Raised before any
    /// store call is made.
    #[error("Unsupported transfer: {0}")]
    UnsupportedTransfer(String),

    /// A transfer aborted part-way. Writes completed before `stage` are not
    /// rolled back.
    #[error("Transfer failed at {stage}: {cause}")]
    TransferFailed {
        stage: TransferStage,
        #[source]
        cause: StoreError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::Unavailable(msg) => CoreError::Fetch(msg),
            StoreError::Rejected { status: 409, body } => CoreError::Conflict(body),
            StoreError::Rejected { status, body } => {
                CoreError::Internal(format!("store rejected request ({status}): {body}"))
            }
            StoreError::Decode(msg) => CoreError::Internal(msg),
        }
    }
}
