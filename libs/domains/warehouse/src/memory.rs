//! In-memory implementation of ProductStore and TransactionLog (for development/testing)

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::error::{WarehouseError, WarehouseResult};
use crate::models::{ProductDocument, ProductDraft, StockTransaction, StoredProduct, WarehouseId};
use crate::query::ProductQuery;
use crate::store::{ProductStore, Snapshot, SnapshotStream, TransactionLog};

#[derive(Debug)]
struct Inner {
    products: RwLock<HashMap<String, ProductDocument>>,
    transactions: RwLock<Vec<StockTransaction>>,
    /// Bumped on every product mutation; live queries re-read when it moves
    revision: watch::Sender<u64>,
    /// Message the next subscription fails with
    pending_failure: Mutex<Option<String>>,
    /// Message the next history lookup fails with
    history_failure: Mutex<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct InMemoryProductStore {
    inner: Arc<Inner>,
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                products: RwLock::new(HashMap::new()),
                transactions: RwLock::new(Vec::new()),
                revision,
                pending_failure: Mutex::new(None),
                history_failure: Mutex::new(None),
            }),
        }
    }

    /// Insert or replace a document under a caller-chosen key
    pub async fn put(&self, id: impl Into<String>, doc: ProductDocument) {
        self.inner.products.write().await.insert(id.into(), doc);
        self.bump();
    }

    pub async fn get(&self, id: &str) -> Option<ProductDocument> {
        self.inner.products.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn record_transaction(&self, transaction: StockTransaction) {
        self.inner.transactions.write().await.push(transaction);
    }

    /// Make the next subscription end with an error instead of a snapshot
    pub async fn fail_next_subscription(&self, message: impl Into<String>) {
        *self.inner.pending_failure.lock().await = Some(message.into());
    }

    /// Make the next history lookup fail
    pub async fn fail_next_history(&self, message: impl Into<String>) {
        *self.inner.history_failure.lock().await = Some(message.into());
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }
}

impl Inner {
    async fn snapshot(&self, query: &ProductQuery) -> Snapshot {
        let products = self.products.read().await;
        let mut matching: Vec<StoredProduct> = products
            .iter()
            .filter(|(_, doc)| query.matches(doc))
            .map(|(id, doc)| StoredProduct {
                id: id.clone(),
                data: doc.clone(),
            })
            .collect();

        // Every composed query orders by the `order` key; ties break on the id
        matching.sort_by(|a, b| (a.data.order, &a.id).cmp(&(b.data.order, &b.id)));
        matching
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    fn subscribe(&self, query: ProductQuery) -> SnapshotStream {
        let inner = Arc::clone(&self.inner);

        Box::pin(async_stream::stream! {
            let failure = inner.pending_failure.lock().await.take();
            if let Some(message) = failure {
                yield Err(WarehouseError::Subscription(message));
                return;
            }

            let mut revisions = inner.revision.subscribe();
            loop {
                revisions.borrow_and_update();
                let snapshot = inner.snapshot(&query).await;
                yield Ok(snapshot);

                if revisions.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    async fn create(&self, draft: ProductDraft) -> WarehouseResult<StoredProduct> {
        let mut products = self.inner.products.write().await;
        let order = products.values().map(|doc| doc.order).max().unwrap_or(0) + 1;

        let product = StoredProduct {
            id: Uuid::now_v7().to_string(),
            data: draft.into_document(order),
        };
        products.insert(product.id.clone(), product.data.clone());
        drop(products);
        self.bump();

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: &str, draft: ProductDraft) -> WarehouseResult<StoredProduct> {
        let mut products = self.inner.products.write().await;
        let existing = products
            .get_mut(id)
            .ok_or_else(|| WarehouseError::NotFound(id.to_string()))?;

        *existing = draft.into_document(existing.order);
        let product = StoredProduct {
            id: id.to_string(),
            data: existing.clone(),
        };
        drop(products);
        self.bump();

        Ok(product)
    }

    async fn delete(&self, id: &str) -> WarehouseResult<()> {
        let removed = self.inner.products.write().await.remove(id);
        if removed.is_none() {
            return Err(WarehouseError::NotFound(id.to_string()));
        }
        self.bump();
        Ok(())
    }

    async fn move_to_warehouse(&self, id: &str, warehouse: WarehouseId) -> WarehouseResult<()> {
        let mut products = self.inner.products.write().await;
        let existing = products
            .get_mut(id)
            .ok_or_else(|| WarehouseError::NotFound(id.to_string()))?;
        existing.warehouse = warehouse;
        drop(products);
        self.bump();
        Ok(())
    }
}

#[async_trait]
impl TransactionLog for InMemoryProductStore {
    async fn history(&self, product_id: &str) -> WarehouseResult<Vec<StockTransaction>> {
        let failure = self.inner.history_failure.lock().await.take();
        if let Some(message) = failure {
            return Err(WarehouseError::Database(message));
        }

        let mut history: Vec<StockTransaction> = self
            .inner
            .transactions
            .read()
            .await
            .iter()
            .filter(|t| t.product_id == product_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(history)
    }
}
