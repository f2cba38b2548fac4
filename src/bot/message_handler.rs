//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info};

use super::commands::{parse_command, Command};
use super::ui_builder::{
    format_command_error, format_help, format_library, format_library_error, format_needed_count,
    format_new_items_alert, format_shopping_list, format_welcome,
};
use super::{BotState, UserSession};
use crate::alerts::AlertEvent;
use crate::db;
use crate::errors::LibraryError;
use crate::library::{Library, LibraryCategory};
use crate::localization::{t_args_lang, t_lang};
use crate::recompute::{NeededSnapshot, RefreshTrigger};

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<BotState>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());
    let chat_id = msg.chat.id;
    let user_id = chat_id.0;

    debug!(user_id, "Received message");

    let command = match parse_command(text) {
        Ok(command) => command,
        Err(e) => {
            debug!(user_id, error = ?e, "Rejected command");
            bot.send_message(chat_id, format_command_error(&e, language_code))
                .await?;
            return Ok(());
        }
    };

    let session = state.session(user_id);
    session.remember_language(language_code);
    let changes_pantry = matches!(
        command,
        Command::Add { .. } | Command::Remove { .. } | Command::Save { .. }
    );
    let reply = match command {
        Command::Start => format_welcome(language_code),
        Command::Help => format_help(language_code),
        Command::Needed => match refresh_seen(&session).await {
            Some(snapshot) => format_needed_count(snapshot.count(), language_code),
            None => t_lang("error-storage", language_code),
        },
        Command::Shopping => match refresh_seen(&session).await {
            Some(snapshot) => format_shopping_list(&snapshot.shopping_list, language_code),
            None => t_lang("error-storage", language_code),
        },
        Command::Library => match db::get_library_row(state.store().pool(), user_id).await {
            Ok(row) => format_library(&Library::from_row(&row.unwrap_or_default()), language_code),
            Err(e) => {
                error!(user_id, error = %e, "Failed to read library");
                t_lang("error-storage", language_code)
            }
        },
        Command::Add { category, item } => {
            let result = db::add_library_item(state.store().pool(), user_id, category, &item).await;
            let keys = ("library-added", "library-already-present");
            library_edit_reply(result, category, &item, keys, language_code)
        }
        Command::Remove { category, item } => {
            let result =
                db::remove_library_item(state.store().pool(), user_id, category, &item).await;
            let keys = ("library-removed", "library-not-found");
            library_edit_reply(result, category, &item, keys, language_code)
        }
        Command::Save { name, ingredients } => {
            let count = ingredients.len();
            let payload = Value::Array(ingredients.into_iter().map(Value::String).collect());
            let saved =
                db::create_saved_dish(state.store().pool(), user_id, &name, &payload, None, None)
                    .await;
            match saved {
                Ok(dish_id) => {
                    info!(user_id, dish_id, "Dish saved from chat");
                    t_args_lang(
                        "dish-saved",
                        &[
                            ("dish_name", name.as_str()),
                            ("ingredient_count", count.to_string().as_str()),
                        ],
                        language_code,
                    )
                }
                Err(e) => {
                    error!(user_id, error = %e, "Failed to save dish");
                    t_lang("error-storage", language_code)
                }
            }
        }
        Command::Cooked { name } => {
            let args = [("dish_name", name.as_str())];
            match db::record_cooked_dish(state.store().pool(), user_id, &name).await {
                Ok(Some(_)) => t_args_lang("dish-cooked", &args, language_code),
                Ok(None) => t_args_lang("dish-not-found", &args, language_code),
                Err(e) => {
                    error!(user_id, error = %e, "Failed to record cooked dish");
                    t_lang("error-storage", language_code)
                }
            }
        }
        Command::Unknown => t_lang("text-response", language_code),
    };

    bot.send_message(chat_id, reply).await?;

    if changes_pantry {
        let event = session
            .refresh(RefreshTrigger::UserAction)
            .await
            .and_then(|snapshot| session.observe(snapshot.count()));
        if let Some(AlertEvent::NewItemsNeeded { added, total }) = event {
            bot.send_message(chat_id, format_new_items_alert(added, total, language_code))
                .await?;
        }
    }

    Ok(())
}

fn library_edit_reply(
    result: Result<bool, LibraryError>,
    category: LibraryCategory,
    item: &str,
    (changed_key, unchanged_key): (&str, &str),
    language_code: Option<&str>,
) -> String {
    let category = category.to_string();
    match result {
        Ok(changed) => t_args_lang(
            if changed { changed_key } else { unchanged_key },
            &[("item", item), ("category", category.as_str())],
            language_code,
        ),
        Err(e) => {
            if let LibraryError::Storage(msg) = &e {
                error!(error = %msg, "Library edit failed");
            }
            format_library_error(&e, language_code)
        }
    }
}

/// Refresh for a view that shows the needed list; the user has now seen it
async fn refresh_seen(session: &UserSession) -> Option<NeededSnapshot> {
    let snapshot = session.refresh(RefreshTrigger::Focus).await?;
    session.observe(snapshot.count());
    session.acknowledge();
    Some(snapshot)
}
