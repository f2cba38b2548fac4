//! Bot module for handling Telegram interactions
//!
//! - `change_listener`: refreshes active sessions on database change notifications
//! - `commands`: parses message text into typed commands
//! - `message_handler`: runs commands against storage and the reconciler
//! - `ui_builder`: formats replies

pub mod change_listener;
pub mod commands;
pub mod message_handler;
pub mod ui_builder;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, warn};

use crate::alerts::{AlertEvent, NeededAlert};
use crate::db::PgStore;
use crate::recompute::{NeededSnapshot, Reconciler, RefreshOutcome, RefreshTrigger};

pub use change_listener::listen_for_changes;
pub use message_handler::message_handler;

/// How long a superseded refresh waits for the run that replaced it
const SUPERSEDED_WAIT: Duration = Duration::from_secs(10);

/// Per-user recompute state
pub struct UserSession {
    pub reconciler: Reconciler<PgStore>,
    alert: Mutex<NeededAlert>,
    language_code: Mutex<Option<String>>,
}

impl UserSession {
    fn new(user_id: i64, store: PgStore) -> Self {
        Self {
            reconciler: Reconciler::new(user_id, store),
            alert: Mutex::new(NeededAlert::new()),
            language_code: Mutex::new(None),
        }
    }

    /// Latest snapshot after a refresh; a superseded run waits for the newer one
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Option<NeededSnapshot> {
        match self.reconciler.refresh(trigger).await {
            Ok(RefreshOutcome::Published(snapshot)) => Some(snapshot),
            Ok(RefreshOutcome::Superseded { generation }) => {
                let snapshot = self.reconciler.next_published(SUPERSEDED_WAIT).await;
                if snapshot.is_none() {
                    warn!(
                        user_id = self.reconciler.user_id(),
                        generation,
                        "No newer snapshot after superseded refresh"
                    );
                }
                snapshot
            }
            Err(e) => {
                error!(user_id = self.reconciler.user_id(), error = %e, "Needed-items refresh failed");
                None
            }
        }
    }

    /// Language of the user's last message, for replies sent unprompted
    pub fn language_code(&self) -> Option<String> {
        self.language_code
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn remember_language(&self, language_code: Option<&str>) {
        *self
            .language_code
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = language_code.map(str::to_string);
    }

    /// Feed a fresh count to the alert state machine
    pub fn observe(&self, count: usize) -> Option<AlertEvent> {
        self.alert
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .observe(count)
    }

    pub fn acknowledge(&self) {
        self.alert
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .acknowledge();
    }
}

/// Shared state handed to every handler
pub struct BotState {
    store: PgStore,
    sessions: Mutex<HashMap<i64, Arc<UserSession>>>,
}

impl BotState {
    pub fn new(store: PgStore) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &PgStore {
        &self.store
    }

    /// Session for a user who has already talked to the bot
    pub fn existing_session(&self, user_id: i64) -> Option<Arc<UserSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&user_id)
            .cloned()
    }

    /// Session for a user, created on first contact
    pub fn session(&self, user_id: i64) -> Arc<UserSession> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            sessions
                .entry(user_id)
                .or_insert_with(|| Arc::new(UserSession::new(user_id, self.store.clone()))),
        )
    }
}
