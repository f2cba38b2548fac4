//! # Recompute Service
//!
//! Re-runs reconciliation for one user whenever something relevant happens
//! (screen focus, a realtime change notification, an explicit user action).
//!
//! Every refresh recomputes from scratch. Saved dishes and the library are
//! fetched concurrently, the pure computation runs synchronously, and the
//! result overwrites the previously published snapshot. A generation counter
//! keeps a slow, superseded refresh from publishing over a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::categorizer::ShoppingList;
use crate::dish::SavedDish;
use crate::library::{build_index, LibraryRow};
use crate::reconcile::{compute_needed, NeededItems};

/// Read side of the persistence layer the recompute depends on
pub trait PantryStore: Send + Sync {
    fn saved_dishes(&self, user_id: i64) -> impl Future<Output = Result<Vec<SavedDish>>> + Send;

    fn library_row(&self, user_id: i64) -> impl Future<Output = Result<Option<LibraryRow>>> + Send;
}

/// Table a realtime change notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    SavedDishes,
    #[serde(alias = "user_library")]
    Library,
    CookedDishes,
}

/// Why a refresh was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    Focus,
    RealtimeChange(Table),
    UserAction,
}

/// Result of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct NeededSnapshot {
    pub generation: u64,
    pub trigger: RefreshTrigger,
    pub needed: NeededItems,
    pub shopping_list: ShoppingList,
    pub computed_at: DateTime<Utc>,
}

impl NeededSnapshot {
    pub fn count(&self) -> usize {
        self.needed.len()
    }
}

/// Outcome of a refresh call
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Published(NeededSnapshot),
    /// A newer refresh started, or the reconciler was closed, before this one finished
    Superseded { generation: u64 },
}

pub struct Reconciler<S> {
    user_id: i64,
    store: S,
    generation: AtomicU64,
    closed: AtomicBool,
    latest: watch::Sender<Option<NeededSnapshot>>,
}

impl<S: PantryStore> Reconciler<S> {
    pub fn new(user_id: i64, store: S) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            user_id,
            store,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            latest,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Option<NeededSnapshot>> {
        self.latest.subscribe()
    }

    /// Last published snapshot, if any
    pub fn latest(&self) -> Option<NeededSnapshot> {
        self.latest.borrow().clone()
    }

    /// Wait up to `timeout` for a published snapshot.
    ///
    /// Returns at once when one is already published. A superseded refresh
    /// uses this to pick up the result of the refresh that replaced it.
    pub async fn next_published(&self, timeout: Duration) -> Option<NeededSnapshot> {
        let mut updates = self.latest.subscribe();
        let snapshot = match tokio::time::timeout(timeout, updates.wait_for(Option::is_some)).await {
            Ok(Ok(snapshot)) => snapshot.clone(),
            _ => None,
        };
        snapshot
    }

    /// Recompute and publish unless superseded.
    ///
    /// Store failures are returned to the caller and leave the previous
    /// snapshot in place.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Result<RefreshOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(user_id = self.user_id, generation, ?trigger, "Starting needed-items refresh");

        let (dishes, row) = tokio::try_join!(
            self.store.saved_dishes(self.user_id),
            self.store.library_row(self.user_id),
        )
        .with_context(|| format!("Failed to load pantry data for user {}", self.user_id))?;

        let index = build_index(row.as_ref());
        let needed = compute_needed(&dishes, &index);
        let shopping_list = ShoppingList::from_needed(&needed);
        let snapshot = NeededSnapshot {
            generation,
            trigger,
            needed,
            shopping_list,
            computed_at: Utc::now(),
        };

        if self.is_stale(generation) {
            warn!(user_id = self.user_id, generation, "Discarding superseded refresh result");
            return Ok(RefreshOutcome::Superseded { generation });
        }

        info!(
            user_id = self.user_id,
            generation,
            needed = snapshot.count(),
            dishes = dishes.len(),
            "Needed items recomputed"
        );
        self.latest.send_replace(Some(snapshot.clone()));
        Ok(RefreshOutcome::Published(snapshot))
    }

    /// Stop publishing; any in-flight refresh becomes stale
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.is_closed() || self.generation.load(Ordering::SeqCst) != generation
    }
}
