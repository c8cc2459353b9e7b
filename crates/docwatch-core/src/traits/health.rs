//! Store health port, polled by `/health`.

use async_trait::async_trait;

/// Reports whether the document store can currently be queried.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// `true` when the store answers a trivial query.
    async fn is_reachable(&self) -> bool;
}
