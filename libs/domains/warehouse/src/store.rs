use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::WarehouseResult;
use crate::models::{ProductDraft, StockTransaction, StoredProduct, WarehouseId};
use crate::query::ProductQuery;

/// Full ordered result set of a live query at one point in time
pub type Snapshot = Vec<StoredProduct>;

/// Stream of snapshots; ends after the first error
pub type SnapshotStream = BoxStream<'static, WarehouseResult<Snapshot>>;

/// Document store holding the product collection
///
/// Implementations deliver the complete matching result set on subscription and
/// again after every change that may affect it. Mutations never touch the
/// caller's projection directly; they surface through the next snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Open a live query. Dropping the stream releases the subscription.
    fn subscribe(&self, query: ProductQuery) -> SnapshotStream;

    /// Insert a new product at the end of the ordering
    async fn create(&self, draft: ProductDraft) -> WarehouseResult<StoredProduct>;

    /// Replace the editable fields of a product, keeping its ordering key
    async fn update(&self, id: &str, draft: ProductDraft) -> WarehouseResult<StoredProduct>;

    async fn delete(&self, id: &str) -> WarehouseResult<()>;

    async fn move_to_warehouse(&self, id: &str, warehouse: WarehouseId) -> WarehouseResult<()>;
}

/// Source of per-product stock movements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Movements of one product, newest first
    async fn history(&self, product_id: &str) -> WarehouseResult<Vec<StockTransaction>>;
}
