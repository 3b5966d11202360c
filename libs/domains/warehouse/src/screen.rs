//! Screen controller
//!
//! Single owner of the inventory screen state. Every user action is a method
//! taking `&mut self`; live updates arrive over the projector's event channel
//! and are applied through [`WarehouseScreen::next_update`] or
//! [`WarehouseScreen::drain_updates`].

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::error::WarehouseError;
use crate::models::{ProductDraft, ProductRecord, WarehouseId, WarehouseSelector};
use crate::navigation::{NavigationTarget, Navigator};
use crate::notifier::Notifier;
use crate::projector::{Applied, LiveEvent, LiveProjector};
use crate::query::QueryKey;
use crate::search::SearchQuery;
use crate::sections::{EmptyState, Section, build_sections};
use crate::selection::{MenuPosition, Selection};
use crate::store::{ProductStore, TransactionLog};

pub const HISTORY_FAILED: &str = "Failed to load transaction history";
pub const DELETE_FAILED: &str = "Failed to delete product";
pub const MOVE_FAILED: &str = "Failed to move product";
pub const SAVE_FAILED: &str = "Failed to save product";

/// Filter inputs of the screen. Only `warehouse` and `low_stock` reach the
/// store; `search` is applied client-side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub warehouse: WarehouseSelector,
    pub low_stock: bool,
    pub search: String,
}

impl FilterState {
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.warehouse, self.low_stock)
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(&self.search)
    }
}

/// Entries of the record context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Edit,
    Delete,
    Move(WarehouseId),
}

/// Everything a front-end needs to draw the screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub filter: FilterState,
    pub loading: bool,
    pub error: Option<String>,
    pub total_value: f64,
    pub sections: Vec<Section>,
    pub empty: Option<EmptyState>,
    pub selection: Selection,
}

pub struct WarehouseScreen {
    store: Arc<dyn ProductStore>,
    transactions: Arc<dyn TransactionLog>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    filter: FilterState,
    projector: LiveProjector,
    events: mpsc::UnboundedReceiver<LiveEvent>,
    selection: Selection,
    collapsed: HashSet<WarehouseSelector>,
}

impl WarehouseScreen {
    pub fn new(
        store: Arc<dyn ProductStore>,
        transactions: Arc<dyn TransactionLog>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            store,
            transactions,
            notifier,
            navigator,
            filter: FilterState::default(),
            projector: LiveProjector::new(tx),
            events,
            selection: Selection::Idle,
            collapsed: HashSet::new(),
        }
    }

    /// Start from the given filters instead of the defaults
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    /// Read products from a collection other than `products`
    pub fn with_products_collection(mut self, collection: impl Into<String>) -> Self {
        self.projector = self.projector.with_collection(collection);
        self
    }

    /// Open the live subscription for the current filters
    pub fn start(&mut self) {
        self.refresh_subscription();
    }

    fn refresh_subscription(&mut self) {
        let key = self.filter.key();
        if !self.projector.ensure(self.store.as_ref(), key) {
            debug!(
                warehouse = %key.warehouse,
                low_stock = key.low_stock,
                "Subscription already current"
            );
        }
    }

    pub fn set_warehouse(&mut self, warehouse: WarehouseSelector) {
        self.filter.warehouse = warehouse;
        self.refresh_subscription();
    }

    pub fn set_low_stock(&mut self, low_stock: bool) {
        self.filter.low_stock = low_stock;
        self.refresh_subscription();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Reopen the subscription for the current filters, e.g. after it failed
    pub fn reload(&mut self) {
        self.projector
            .reopen(self.store.as_ref(), self.filter.key());
    }

    /// Wait for the next live event and apply it
    pub async fn next_update(&mut self) -> Option<Applied> {
        let event = self.events.recv().await?;
        Some(self.handle_live_event(event))
    }

    /// Apply every live event already queued, without waiting
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_live_event(event);
            applied += 1;
        }
        applied
    }

    fn handle_live_event(&mut self, event: LiveEvent) -> Applied {
        let applied = self.projector.apply(event);
        if let Applied::Failed(message) = &applied {
            self.notifier.error(message);
        }
        applied
    }

    pub fn toggle_section(&mut self, scope: WarehouseSelector) {
        if !self.collapsed.remove(&scope) {
            self.collapsed.insert(scope);
        }
    }

    fn find_record(&self, id: &str) -> Option<ProductRecord> {
        self.projector
            .records()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Returns `false` if `id` is not in the current projection
    pub fn open_context_menu(&mut self, id: &str, position: MenuPosition) -> bool {
        let Some(record) = self.find_record(id) else {
            return false;
        };
        self.selection.open_context_menu(record, position);
        true
    }

    pub fn open_details(&mut self, id: &str) -> bool {
        let Some(record) = self.find_record(id) else {
            return false;
        };
        self.selection.open_details(record);
        true
    }

    /// Load the product's movements and show them. On failure the selection
    /// is cleared and a fixed message is shown whatever the cause.
    #[instrument(skip(self))]
    pub async fn view_history(&mut self, id: &str) -> bool {
        if !self.selection.accepts_list_action() {
            return false;
        }
        let Some(record) = self.find_record(id) else {
            return false;
        };

        match self.transactions.history(&record.id).await {
            Ok(transactions) => {
                debug!(count = transactions.len(), "History loaded");
                self.selection.open_history(record, transactions)
            }
            Err(error) => {
                warn!(product_id = %record.id, %error, "Failed to load transaction history");
                self.selection.close();
                self.notifier.error(HISTORY_FAILED);
                false
            }
        }
    }

    pub fn view_qr_code(&mut self, id: &str) -> bool {
        if !self.selection.accepts_list_action() {
            return false;
        }
        let Some(record) = self.find_record(id) else {
            return false;
        };
        self.selection.open_qr_code(record)
    }

    pub fn begin_add(&mut self) -> bool {
        self.selection.begin_add()
    }

    /// Run a context-menu entry against the record the menu was opened on
    #[instrument(skip(self))]
    pub async fn context_action(&mut self, action: MenuAction) -> bool {
        let Selection::ContextMenu { record, .. } = &self.selection else {
            return false;
        };
        let id = record.id.clone();

        match action {
            MenuAction::Edit => self.selection.begin_edit(),
            MenuAction::Delete => {
                self.selection.close();
                match self.store.delete(&id).await {
                    Ok(()) => {
                        self.notifier.info("Product deleted");
                        true
                    }
                    Err(error) => {
                        warn!(product_id = %id, %error, "Delete failed");
                        self.notifier.error(DELETE_FAILED);
                        false
                    }
                }
            }
            MenuAction::Move(target) => {
                self.selection.close();
                match self.store.move_to_warehouse(&id, target).await {
                    Ok(()) => {
                        self.notifier
                            .info(&format!("Product moved to {}", target.title()));
                        true
                    }
                    Err(error) => {
                        warn!(product_id = %id, %error, "Move failed");
                        self.notifier.error(MOVE_FAILED);
                        false
                    }
                }
            }
        }
    }

    /// Save the editor contents. Creates a product from the add form or
    /// updates the edited one; the editor stays open on any failure.
    #[instrument(skip(self, draft), fields(product_name = %draft.name))]
    pub async fn save(&mut self, draft: ProductDraft) -> bool {
        let Selection::Editor { record } = &self.selection else {
            return false;
        };
        let editing = record.as_ref().map(|record| record.id.clone());

        if let Err(errors) = draft.validate() {
            self.notifier
                .error(&WarehouseError::from(errors).to_string());
            return false;
        }

        let (result, message) = match editing {
            None => (self.store.create(draft).await, "Product added"),
            Some(id) => (self.store.update(&id, draft).await, "Product updated"),
        };

        match result {
            Ok(product) => {
                debug!(product_id = %product.id, "Product saved");
                self.selection.close();
                self.notifier.info(message);
                true
            }
            Err(error) => {
                warn!(%error, "Save failed");
                self.notifier.error(SAVE_FAILED);
                false
            }
        }
    }

    pub fn close(&mut self) {
        self.selection.close();
    }

    pub fn navigate(&self, target: NavigationTarget) {
        debug!(route = target.route(), "Navigating");
        self.navigator.navigate(target);
    }

    /// Records of the live projection that pass the text search
    pub fn filtered_records(&self) -> Vec<ProductRecord> {
        self.filter.search_query().filter(self.projector.records())
    }

    pub fn view(&self) -> ScreenView {
        let search = self.filter.search_query();
        let filtered = search.filter(self.projector.records());
        let loading = self.projector.is_loading();

        // A failed first load has nothing to say about the collection
        let unknown = self.projector.last_error().is_some() && !self.projector.has_snapshot();
        let empty = (!loading && !unknown && filtered.is_empty())
            .then(|| EmptyState::for_search(&search));

        ScreenView {
            filter: self.filter.clone(),
            loading,
            error: self.projector.last_error().map(str::to_string),
            total_value: self.projector.total_value(),
            sections: build_sections(&filtered, self.filter.warehouse, &self.collapsed),
            empty,
            selection: self.selection.clone(),
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn records(&self) -> &[ProductRecord] {
        self.projector.records()
    }

    pub fn total_value(&self) -> f64 {
        self.projector.total_value()
    }

    pub fn is_loading(&self) -> bool {
        self.projector.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.projector.last_error()
    }

    pub fn current_key(&self) -> Option<QueryKey> {
        self.projector.current_key()
    }
}
