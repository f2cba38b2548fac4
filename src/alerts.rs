//! # Needed-Items Alert State Machine
//!
//! Tracks the needed count across recomputes and decides when to tell the
//! user that new items are needed.
//!
//! # State Machine
//!
//! - **Uninitialized**: no count observed yet; the first observation is the
//!   baseline and never notifies
//! - **Idle**: nothing pending
//! - **PendingIncrease**: the count went up and the user was notified once;
//!   further increases stay silent until acknowledged or the count drops

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Uninitialized,
    Idle,
    PendingIncrease,
}

/// Event emitted on the Idle -> PendingIncrease transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEvent {
    NewItemsNeeded { added: usize, total: usize },
}

#[derive(Debug, Clone, Default)]
pub struct NeededAlert {
    state: AlertState,
    last_count: usize,
}

impl NeededAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }

    /// Feed the count from a fresh recompute
    pub fn observe(&mut self, count: usize) -> Option<AlertEvent> {
        let previous = self.last_count;
        self.last_count = count;

        let (next, event) = match self.state {
            AlertState::Uninitialized => (AlertState::Idle, None),
            _ if count < previous => (AlertState::Idle, None),
            AlertState::Idle if count > previous => (
                AlertState::PendingIncrease,
                Some(AlertEvent::NewItemsNeeded {
                    added: count - previous,
                    total: count,
                }),
            ),
            state => (state, None),
        };

        if next != self.state {
            debug!("Alert state {:?} -> {:?} (count {} -> {})", self.state, next, previous, count);
        }
        self.state = next;
        event
    }

    /// The user has seen the needed list
    pub fn acknowledge(&mut self) {
        if self.state == AlertState::PendingIncrease {
            self.state = AlertState::Idle;
        }
    }
}
