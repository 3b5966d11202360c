//! Warehouse Domain
//!
//! Inventory screen state for products spread over several physical
//! warehouses. Persistence and change notification belong to the document
//! store; this crate composes the live query from the screen filters, projects
//! every snapshot into ranked records and keeps the interaction state.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ WarehouseScreen  │  ← Actions, view model, selection, sections
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │  LiveProjector   │  ← One subscription per filter key, generation-tagged events
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │   ProductQuery   │  ← Constraint composition from filter state
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │   ProductStore   │  ← Live queries + mutations (MongoDB / in-memory)
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_warehouse::{
//!     InMemoryProductStore, NavigationTarget, Navigator, TracingNotifier, WarehouseScreen,
//! };
//!
//! struct LogNavigator;
//!
//! impl Navigator for LogNavigator {
//!     fn navigate(&self, target: NavigationTarget) {
//!         println!("-> {}", target.route());
//!     }
//! }
//!
//! # async fn example() {
//! let store = Arc::new(InMemoryProductStore::new());
//! let mut screen = WarehouseScreen::new(
//!     store.clone(),
//!     store,
//!     Arc::new(TracingNotifier),
//!     Arc::new(LogNavigator),
//! );
//!
//! screen.start();
//! screen.next_update().await;
//! println!("{} products", screen.records().len());
//! # }
//! ```

pub mod aggregates;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod navigation;
pub mod notifier;
pub mod projector;
pub mod query;
pub mod screen;
pub mod search;
pub mod sections;
pub mod selection;
pub mod store;

// Re-export commonly used types
pub use config::WarehouseConfig;
pub use error::{WarehouseError, WarehouseResult};
pub use memory::InMemoryProductStore;
pub use models::{
    ProductDocument, ProductDraft, ProductRecord, StockTransaction, StoredProduct,
    TransactionKind, WarehouseId, WarehouseSelector,
};
pub use mongodb::MongoWarehouseStore;
pub use navigation::{NavigationTarget, Navigator};
pub use notifier::{Notifier, TracingNotifier};
pub use projector::{Applied, LiveEvent, LiveProjector};
pub use query::{ProductQuery, QueryKey};
pub use screen::{FilterState, MenuAction, ScreenView, WarehouseScreen};
pub use search::SearchQuery;
pub use sections::{EmptyState, Section};
pub use selection::{MenuPosition, Selection, ViewMode};
pub use store::{ProductStore, TransactionLog};
