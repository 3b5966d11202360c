//! Live result projection
//!
//! The projector owns at most one live subscription. Each subscription runs as a
//! spawned task that maps snapshots into ranked records and forwards them to the
//! screen's event channel, tagged with the generation it was opened under.
//! Replacing or dropping the subscription aborts the task, and events still
//! queued from an older generation are discarded on arrival.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::aggregates::total_value;
use crate::error::WarehouseError;
use crate::models::ProductRecord;
use crate::query::{ProductQuery, QueryKey};
use crate::store::{ProductStore, Snapshot};

/// Message from a subscription task to its owner
#[derive(Debug)]
pub enum LiveEvent {
    Snapshot {
        generation: u64,
        records: Vec<ProductRecord>,
    },
    Failed {
        generation: u64,
        error: WarehouseError,
    },
    /// The store closed the stream without an error
    Closed { generation: u64 },
}

impl LiveEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LiveEvent::Snapshot { generation, .. }
            | LiveEvent::Failed { generation, .. }
            | LiveEvent::Closed { generation } => *generation,
        }
    }
}

/// Outcome of applying a live event
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Event belonged to a subscription that is no longer current
    Stale,
    /// Record list replaced; carries the new record count
    Replaced(usize),
    /// Subscription failed; carries the message to show
    Failed(String),
    Closed,
}

/// Map a snapshot into records ranked 1..=N in document order
pub fn project(snapshot: Snapshot) -> Vec<ProductRecord> {
    snapshot
        .into_iter()
        .enumerate()
        .map(|(index, stored)| ProductRecord::from_stored(stored, index + 1))
        .collect()
}

/// Ownership handle of a running subscription task; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    key: QueryKey,
    generation: u64,
    task: JoinHandle<()>,
}

impl Subscription {
    fn open<S>(
        store: &S,
        query: ProductQuery,
        key: QueryKey,
        generation: u64,
        events: mpsc::UnboundedSender<LiveEvent>,
    ) -> Self
    where
        S: ProductStore + ?Sized,
    {
        let mut snapshots = store.subscribe(query);

        let task = tokio::spawn(async move {
            while let Some(next) = snapshots.next().await {
                let (event, failed) = match next {
                    Ok(snapshot) => (
                        LiveEvent::Snapshot {
                            generation,
                            records: project(snapshot),
                        },
                        false,
                    ),
                    Err(error) => (LiveEvent::Failed { generation, error }, true),
                };

                if events.send(event).is_err() || failed {
                    return;
                }
            }
            let _ = events.send(LiveEvent::Closed { generation });
        });

        Self {
            key,
            generation,
            task,
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
        debug!(generation = self.generation, "Live subscription released");
    }
}

/// In-memory projection of the current live query
#[derive(Debug)]
pub struct LiveProjector {
    events: mpsc::UnboundedSender<LiveEvent>,
    collection: Option<String>,
    subscription: Option<Subscription>,
    generation: u64,
    records: Vec<ProductRecord>,
    total_value: f64,
    loading: bool,
    /// A snapshot arrived since the current subscription opened
    received: bool,
    error: Option<String>,
}

impl LiveProjector {
    pub fn new(events: mpsc::UnboundedSender<LiveEvent>) -> Self {
        Self {
            events,
            collection: None,
            subscription: None,
            generation: 0,
            records: Vec::new(),
            total_value: 0.0,
            loading: true,
            received: false,
            error: None,
        }
    }

    /// Query a collection other than the default `products`
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Make sure a subscription for `key` is open. Returns `true` if a new one
    /// was opened, `false` if the current subscription already serves `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn ensure<S>(&mut self, store: &S, key: QueryKey) -> bool
    where
        S: ProductStore + ?Sized,
    {
        if self.current_key() == Some(key) {
            return false;
        }
        self.open(store, key);
        true
    }

    /// Reopen the subscription for `key` even if it is already current
    pub fn reopen<S>(&mut self, store: &S, key: QueryKey)
    where
        S: ProductStore + ?Sized,
    {
        self.open(store, key);
    }

    fn open<S>(&mut self, store: &S, key: QueryKey)
    where
        S: ProductStore + ?Sized,
    {
        // Release the previous subscription before the next one exists
        self.subscription = None;

        self.generation += 1;
        self.loading = true;
        self.received = false;
        self.error = None;

        let mut query = ProductQuery::compose(key);
        if let Some(collection) = &self.collection {
            query = query.in_collection(collection.clone());
        }

        info!(
            generation = self.generation,
            warehouse = %key.warehouse,
            low_stock = key.low_stock,
            "Opening live subscription"
        );
        self.subscription = Some(Subscription::open(
            store,
            query,
            key,
            self.generation,
            self.events.clone(),
        ));
    }

    /// Drop the current subscription, if any
    pub fn close(&mut self) {
        self.subscription = None;
    }

    /// Apply an event from a subscription task
    pub fn apply(&mut self, event: LiveEvent) -> Applied {
        if event.generation() != self.generation || self.subscription.is_none() {
            debug!(
                event_generation = event.generation(),
                current = self.generation,
                "Discarding stale live event"
            );
            return Applied::Stale;
        }

        match event {
            LiveEvent::Snapshot { records, .. } => {
                self.total_value = total_value(&records);
                self.records = records;
                self.loading = false;
                self.received = true;
                self.error = None;
                debug!(count = self.records.len(), "Snapshot applied");
                Applied::Replaced(self.records.len())
            }
            LiveEvent::Failed { error, .. } => {
                warn!(error = %error, generation = self.generation, "Live subscription failed");
                let message = error.to_string();
                self.loading = false;
                self.error = Some(message.clone());
                Applied::Failed(message)
            }
            LiveEvent::Closed { .. } => {
                self.loading = false;
                Applied::Closed
            }
        }
    }

    pub fn current_key(&self) -> Option<QueryKey> {
        self.subscription.as_ref().map(Subscription::key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.received
    }
}
