//! MongoDB implementation of ProductStore and TransactionLog
//!
//! Live queries are built from a change stream on the products collection: every
//! change event triggers a fresh ordered read of the matching documents. Change
//! streams require a replica set or sharded cluster.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOneOptions, FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{WarehouseError, WarehouseResult};
use crate::models::{ProductDraft, StockTransaction, StoredProduct, WarehouseId};
use crate::query::{
    Comparison, Constraint, FieldValue, PRODUCTS_COLLECTION, ProductQuery, TRANSACTIONS_COLLECTION,
};
use crate::store::{ProductStore, Snapshot, SnapshotStream, TransactionLog};

/// MongoDB-backed warehouse store
#[derive(Clone)]
pub struct MongoWarehouseStore {
    database: Database,
    products: Collection<StoredProduct>,
    transactions: Collection<StockTransaction>,
}

impl MongoWarehouseStore {
    pub fn new(db: &Database) -> Self {
        Self::with_collections(db, PRODUCTS_COLLECTION, TRANSACTIONS_COLLECTION)
    }

    pub fn with_collections(db: &Database, products: &str, transactions: &str) -> Self {
        Self {
            database: db.clone(),
            products: db.collection::<StoredProduct>(products),
            transactions: db.collection::<StockTransaction>(transactions),
        }
    }

    /// Create the indexes the composed live queries rely on
    pub async fn init_indexes(&self) -> WarehouseResult<()> {
        let product_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "order": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_order".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "warehouse": 1, "order": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_warehouse_order".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "quantity": 1, "order": 1, "warehouse": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_quantity_order_warehouse".to_string())
                        .build(),
                )
                .build(),
        ];
        self.products.create_indexes(product_indexes).await?;

        let history_index = IndexModel::builder()
            .keys(doc! { "productId": 1, "date": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_product_date".to_string())
                    .build(),
            )
            .build();
        self.transactions.create_index(history_index).await?;

        tracing::info!(
            database = %self.database.name(),
            "Warehouse indexes created successfully"
        );
        Ok(())
    }

    /// Translate the query's filter clauses into a MongoDB filter document
    fn build_filter(query: &ProductQuery) -> Document {
        let mut filter = doc! {};

        for constraint in query.filters() {
            let Constraint::Where { field, op, value } = constraint else {
                continue;
            };
            let value = match value {
                FieldValue::Text(text) => mongodb::bson::Bson::String(text.clone()),
                FieldValue::Number(number) => mongodb::bson::Bson::Double(*number),
            };
            match op {
                Comparison::Equal => {
                    filter.insert(field.to_string(), value);
                }
                Comparison::LessOrEqual => {
                    filter.insert(field.to_string(), doc! { "$lte": value });
                }
            }
        }

        // Ordering drops documents that lack the sort key
        for field in query.ordering() {
            let key = field.to_string();
            if !filter.contains_key(&key) {
                filter.insert(key, doc! { "$exists": true });
            }
        }

        filter
    }

    /// Sort document for the query's ordering clauses
    fn build_sort(query: &ProductQuery) -> Document {
        let mut sort = doc! {};
        for field in query.ordering() {
            sort.insert(field.to_string(), 1);
        }
        // Stable order between documents sharing an ordering key
        sort.insert("_id", 1);
        sort
    }

    async fn read_snapshot(
        collection: &Collection<StoredProduct>,
        filter: Document,
        sort: Document,
    ) -> WarehouseResult<Snapshot> {
        let options = FindOptions::builder().sort(sort).build();
        let cursor = collection.find(filter).with_options(options).await?;
        let products: Vec<StoredProduct> = cursor.try_collect().await?;
        Ok(products)
    }

    async fn next_order(&self) -> WarehouseResult<i64> {
        let options = FindOneOptions::builder().sort(doc! { "order": -1 }).build();
        let last = self.products.find_one(doc! {}).with_options(options).await?;
        Ok(last.map_or(1, |p| p.data.order + 1))
    }

    async fn find(&self, id: &str) -> WarehouseResult<StoredProduct> {
        self.products
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| WarehouseError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ProductStore for MongoWarehouseStore {
    #[instrument(skip(self), fields(collection = %query.collection))]
    fn subscribe(&self, query: ProductQuery) -> SnapshotStream {
        let collection = self
            .database
            .collection::<StoredProduct>(&query.collection);
        let filter = Self::build_filter(&query);
        let sort = Self::build_sort(&query);

        Box::pin(async_stream::stream! {
            // Watch before the first read so no change between the two is missed
            let mut changes = match collection.clone_with_type::<Document>().watch().await {
                Ok(changes) => changes,
                Err(e) => {
                    yield Err(WarehouseError::Subscription(e.to_string()));
                    return;
                }
            };

            match Self::read_snapshot(&collection, filter.clone(), sort.clone()).await {
                Ok(snapshot) => yield Ok(snapshot),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }

            while let Some(event) = changes.next().await {
                if let Err(e) = event {
                    yield Err(WarehouseError::Subscription(e.to_string()));
                    return;
                }

                match Self::read_snapshot(&collection, filter.clone(), sort.clone()).await {
                    Ok(snapshot) => yield Ok(snapshot),
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            tracing::debug!("Change stream closed by server");
        })
    }

    #[instrument(skip(self, draft), fields(product_name = %draft.name))]
    async fn create(&self, draft: ProductDraft) -> WarehouseResult<StoredProduct> {
        let order = self.next_order().await?;
        let product = StoredProduct {
            id: Uuid::now_v7().to_string(),
            data: draft.into_document(order),
        };

        self.products.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, order, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: &str, draft: ProductDraft) -> WarehouseResult<StoredProduct> {
        let existing = self.find(id).await?;
        let updated = StoredProduct {
            id: existing.id,
            data: draft.into_document(existing.data.order),
        };

        let result = self
            .products
            .replace_one(doc! { "_id": id }, &updated)
            .await?;
        if result.matched_count == 0 {
            return Err(WarehouseError::NotFound(id.to_string()));
        }

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> WarehouseResult<()> {
        let result = self.products.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(WarehouseError::NotFound(id.to_string()));
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn move_to_warehouse(&self, id: &str, warehouse: WarehouseId) -> WarehouseResult<()> {
        let result = self
            .products
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "warehouse": warehouse.to_string() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(WarehouseError::NotFound(id.to_string()));
        }

        tracing::info!(product_id = %id, %warehouse, "Product moved");
        Ok(())
    }
}

#[async_trait]
impl TransactionLog for MongoWarehouseStore {
    #[instrument(skip(self))]
    async fn history(&self, product_id: &str) -> WarehouseResult<Vec<StockTransaction>> {
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
        let cursor = self
            .transactions
            .find(doc! { "productId": product_id })
            .with_options(options)
            .await?;
        let transactions: Vec<StockTransaction> = cursor.try_collect().await?;

        tracing::debug!(count = transactions.len(), "Transaction history loaded");
        Ok(transactions)
    }
}
