//! UI Builder module for formatting bot replies

use crate::bot::commands::CommandError;
use crate::categorizer::ShoppingList;
use crate::errors::LibraryError;
use crate::library::Library;
use crate::localization::{t_args_lang, t_lang};

pub fn format_welcome(language_code: Option<&str>) -> String {
    format!(
        "👋 {}\n\n{}\n\n{}",
        t_lang("welcome-title", language_code),
        t_lang("welcome-description", language_code),
        t_lang("welcome-help", language_code)
    )
}

pub fn format_help(language_code: Option<&str>) -> String {
    [
        "help-title",
        "help-commands",
        "help-needed",
        "help-shopping",
        "help-library",
        "help-add",
        "help-remove",
        "help-save",
        "help-cooked",
        "help-categories",
    ]
    .iter()
    .map(|key| t_lang(key, language_code))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn format_needed_count(count: usize, language_code: Option<&str>) -> String {
    if count == 0 {
        return t_lang("needed-none", language_code);
    }
    t_args_lang("needed-count", &[("count", count.to_string().as_str())], language_code)
}

/// Shopping list grouped by bucket, one bullet per item
pub fn format_shopping_list(list: &ShoppingList, language_code: Option<&str>) -> String {
    if list.is_empty() {
        return t_lang("shopping-empty", language_code);
    }

    let mut result = format!("🛒 {}\n", t_lang("shopping-title", language_code));
    for (category, items) in list.iter() {
        result.push_str(&format!("\n{} ({})\n", category.label(), items.len()));
        for item in items {
            result.push_str(&format!("• {}\n", item));
        }
    }
    result
}

pub fn format_library(library: &Library, language_code: Option<&str>) -> String {
    if library.is_empty() {
        return t_lang("library-empty", language_code);
    }

    let mut result = format!("📚 {}\n", t_lang("library-title", language_code));
    for (category, items) in library.iter() {
        result.push_str(&format!("\n{}: {}\n", category, items.join(", ")));
    }
    result
}

pub fn format_new_items_alert(added: usize, total: usize, language_code: Option<&str>) -> String {
    t_args_lang(
        "alert-new-items",
        &[
            ("added", added.to_string().as_str()),
            ("total", total.to_string().as_str()),
        ],
        language_code,
    )
}

pub fn format_command_error(error: &CommandError, language_code: Option<&str>) -> String {
    match error {
        CommandError::Usage("add") => t_lang("error-usage-add", language_code),
        CommandError::Usage("remove") => t_lang("error-usage-remove", language_code),
        CommandError::Usage(_) => t_lang("error-usage-cooked", language_code),
        CommandError::Invalid(err) => format_library_error(err, language_code),
    }
}

pub fn format_library_error(error: &LibraryError, language_code: Option<&str>) -> String {
    match error {
        LibraryError::UnknownCategory(name) => {
            t_args_lang("error-unknown-category", &[("category", name.as_str())], language_code)
        }
        LibraryError::EmptyItem => t_lang("error-empty-item", language_code),
        LibraryError::InvalidDishName(_) => t_lang("error-dish-name", language_code),
        LibraryError::NoIngredients => t_lang("error-no-ingredients", language_code),
        LibraryError::Storage(_) => t_lang("error-storage", language_code),
    }
}
