use std::sync::Arc;

use vidshelf_core::executor::TransferExecutor;
use vidshelf_core::membership::{MembershipModel, Snapshot};
use vidshelf_core::store::RemoteStore;
use vidshelf_core::transfer::TransferProtocol;

use crate::config::ServerConfig;
use crate::error::AppResult;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is `Copy`.
#[derive(Clone)]
pub struct AppState {
    /// Backing document store (memory, HTTP or Postgres).
    pub store: Arc<dyn RemoteStore>,
    /// Last loaded category memberships.
    pub membership: Arc<MembershipModel>,
    pub executor: Arc<TransferExecutor>,
    pub protocol: TransferProtocol,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the membership model and executor over `store`.
    pub fn new(store: Arc<dyn RemoteStore>, config: ServerConfig) -> Self {
        let membership = Arc::new(MembershipModel::new(Arc::clone(&store)));
        let mut executor = TransferExecutor::new(Arc::clone(&store), Arc::clone(&membership));
        if config.serialize_transfers {
            executor = executor.with_category_queue();
        }

        Self {
            store,
            membership,
            executor: Arc::new(executor),
            protocol: TransferProtocol::new(config.pool_drop_target),
            config: Arc::new(config),
        }
    }

    /// The current snapshot, loading it first if nothing has been loaded yet.
    pub async fn snapshot(&self) -> AppResult<Arc<Snapshot>> {
        let current = self.membership.snapshot();
        if current.loaded_at().is_some() {
            return Ok(current);
        }
        Ok(self.membership.load().await?)
    }
}
