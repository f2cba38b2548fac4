//! Realtime refreshes from Postgres change notifications
//!
//! Row triggers on the pantry tables publish `{"table": ..., "user_id": ...}`
//! on [`CHANGE_CHANNEL`]. Each notice refreshes the matching user's session,
//! if they have one, and sends the new-items alert when it fires.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::postgres::{PgListener, PgPool};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use super::ui_builder::format_new_items_alert;
use super::BotState;
use crate::alerts::AlertEvent;
use crate::db::CHANGE_CHANNEL;
use crate::recompute::{RefreshTrigger, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChangeNotice {
    pub table: Table,
    pub user_id: i64,
}

/// Decode a notification payload; malformed payloads are logged and dropped
pub fn parse_notice(payload: &str) -> Option<ChangeNotice> {
    match serde_json::from_str(payload) {
        Ok(notice) => Some(notice),
        Err(e) => {
            warn!(payload, error = %e, "Ignoring malformed change notification");
            None
        }
    }
}

/// Run until the listener connection fails for good
pub async fn listen_for_changes(bot: Bot, pool: PgPool, state: Arc<BotState>) -> Result<()> {
    let mut listener = PgListener::connect_with(&pool)
        .await
        .context("Failed to open change listener")?;
    listener
        .listen(CHANGE_CHANNEL)
        .await
        .context("Failed to subscribe to change notifications")?;
    info!(channel = CHANGE_CHANNEL, "Listening for pantry changes");

    loop {
        let notification = listener
            .recv()
            .await
            .context("Change listener connection lost")?;
        let Some(notice) = parse_notice(notification.payload()) else {
            continue;
        };
        let Some(session) = state.existing_session(notice.user_id) else {
            debug!(user_id = notice.user_id, "No active session for change");
            continue;
        };

        let event = session
            .refresh(RefreshTrigger::RealtimeChange(notice.table))
            .await
            .and_then(|snapshot| session.observe(snapshot.count()));
        if let Some(AlertEvent::NewItemsNeeded { added, total }) = event {
            let language_code = session.language_code();
            let text = format_new_items_alert(added, total, language_code.as_deref());
            if let Err(e) = bot.send_message(ChatId(notice.user_id), text).await {
                error!(user_id = notice.user_id, error = %e, "Failed to send new-items alert");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notice() {
        assert_eq!(
            parse_notice(r#"{"table": "user_library", "user_id": 12}"#),
            Some(ChangeNotice {
                table: Table::Library,
                user_id: 12
            })
        );
        assert_eq!(
            parse_notice(r#"{"table": "saved_dishes", "user_id": -5}"#).map(|n| n.table),
            Some(Table::SavedDishes)
        );
        assert_eq!(
            parse_notice(r#"{"table": "cooked_dishes", "user_id": 3}"#).map(|n| n.table),
            Some(Table::CookedDishes)
        );
        assert_eq!(parse_notice(r#"{"table": "orders", "user_id": 1}"#), None);
        assert_eq!(parse_notice("not json"), None);
    }
}
