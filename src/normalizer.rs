//! # Text Normalizer
//!
//! Reduces a free-text ingredient line such as
//! `"2 cups chopped fresh spinach, divided"` to its primary noun phrase
//! (`"spinach"`), and formats names for display.
//!
//! ## Steps
//!
//! 1. Coerce arbitrary JSON payloads to a string ([`normalize_value`])
//! 2. Lowercase and strip leading bullets
//! 3. Strip a leading quantity and unit
//! 4. Remove parenthetical asides
//! 5. Keep the primary clause (up to the first `;` or `,`)
//! 6. Drop descriptor words, falling back to the best non-empty form
//!
//! Normalization never fails: malformed input degrades to an empty string.
//!
//! ## Usage
//!
//! ```rust
//! use pantry::normalizer::{format_for_display, normalize};
//!
//! let name = normalize("2 cups chopped fresh spinach, divided");
//! assert_eq!(name, "spinach");
//! assert_eq!(format_for_display("extra  virgin olive oil"), "Extra Virgin Olive Oil");
//! ```

use log::trace;
use serde_json::Value;

use crate::measurement_patterns::{
    BULLET_REGEX, DESCRIPTOR_SET, MEASUREMENT_PREFIX_REGEX, PARENTHETICAL_REGEX,
};

/// Keys tried, in order, when an ingredient arrives as a JSON object
pub const OBJECT_KEY_PRIORITY: &[&str] = &["name", "title", "text", "label", "ingredient", "value"];

/// Normalize a raw ingredient line to its primary noun phrase (lowercase).
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let lowered = raw.trim().to_lowercase();
    let bullet_stripped = BULLET_REGEX.replace(&lowered, "").trim().to_string();
    let measure_stripped = MEASUREMENT_PREFIX_REGEX
        .replace(&bullet_stripped, "")
        .trim()
        .to_string();
    let without_parens = PARENTHETICAL_REGEX.replace_all(&measure_stripped, " ");
    let primary = without_parens
        .split([';', ','])
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let kept: Vec<&str> = primary
        .split_whitespace()
        .filter(|token| !DESCRIPTOR_SET.contains(token))
        .collect();

    let result = if kept.is_empty() {
        let last_word = primary.split_whitespace().last().unwrap_or_default();
        [
            last_word,
            primary.as_str(),
            measure_stripped.as_str(),
            bullet_stripped.as_str(),
            lowered.as_str(),
        ]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
        .to_string()
    } else {
        kept.join(" ")
    };

    trace!("Normalized ingredient '{}' -> '{}'", raw, result);
    result
}

/// Normalize an ingredient entry of unknown shape.
///
/// Strings are normalized directly; arrays yield their first non-empty
/// normalized element; objects are read through [`OBJECT_KEY_PRIORITY`].
/// Numbers and booleans are stringified. Anything else is empty.
pub fn normalize_value(raw: &Value) -> String {
    match raw {
        Value::String(text) => normalize(text),
        Value::Array(items) => items
            .iter()
            .map(normalize_value)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default(),
        Value::Object(fields) => OBJECT_KEY_PRIORITY
            .iter()
            .filter_map(|key| fields.get(*key))
            .find(|value| !value.is_null())
            .map(normalize_value)
            .unwrap_or_default(),
        Value::Number(number) => normalize(&number.to_string()),
        Value::Bool(flag) => normalize(&flag.to_string()),
        Value::Null => String::new(),
    }
}

/// Collapse whitespace and Title-Case every word. Presentation only.
pub fn format_for_display(name: &str) -> String {
    name.split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
