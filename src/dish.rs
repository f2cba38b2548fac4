//! # Saved Dish Model
//!
//! Saved-dish rows and the coercion of their ingredient payloads.
//!
//! The dish generator and older clients stored `ingredients` in several
//! shapes: a JSON array, a JSON-encoded array inside a string, a
//! newline- or comma-delimited string, or a bare string. Each shape is turned
//! into a list of individual entries here; normalization happens later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::LibraryError;
use crate::measurement_patterns::DESCRIPTOR_SET;

/// Maximum length of a dish name
pub const MAX_DISH_NAME_LENGTH: usize = 255;

/// A saved dish as read from storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDish {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Value,
    #[serde(default)]
    pub suggested_sides: Option<Value>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedDish {
    pub fn new(id: i64, ingredients: Value) -> Self {
        Self {
            id,
            name: None,
            ingredients,
            suggested_sides: None,
            meal_type: None,
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_sides(mut self, sides: Value) -> Self {
        self.suggested_sides = Some(sides);
        self
    }

    pub fn with_meal_type(mut self, meal_type: &str) -> Self {
        self.meal_type = Some(meal_type.to_string());
        self
    }

    /// Individual ingredient entries, whatever shape they were stored in
    pub fn ingredient_entries(&self) -> Vec<Value> {
        coerce_entries(&self.ingredients)
    }

    /// Individual suggested-side entries; none when the field is absent
    pub fn side_entries(&self) -> Vec<Value> {
        self.suggested_sides
            .as_ref()
            .map(coerce_entries)
            .unwrap_or_default()
    }

    /// Ingredient entries followed by side entries
    pub fn all_entries(&self) -> Vec<Value> {
        let mut entries = self.ingredient_entries();
        entries.extend(self.side_entries());
        entries
    }
}

/// One entry of a user's cooking history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookedDish {
    pub id: i64,
    pub dish_id: i64,
    pub cooked_at: DateTime<Utc>,
}

/// Split a stored payload into entries.
///
/// Strings that parse as a JSON array are unpacked. Other strings are split
/// on newlines when they contain any, otherwise on commas. A comma piece made
/// only of descriptor words ("divided", "to taste") qualifies the previous
/// ingredient and is dropped.
pub fn coerce_entries(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return items;
                }
            }
            let by_line = trimmed.contains('\n');
            let separator = if by_line { '\n' } else { ',' };
            trimmed
                .split(separator)
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .filter(|piece| by_line || !is_descriptor_clause(piece))
                .map(|piece| Value::String(piece.to_string()))
                .collect()
        }
        other => vec![other.clone()],
    }
}

fn is_descriptor_clause(piece: &str) -> bool {
    piece
        .to_lowercase()
        .split_whitespace()
        .all(|token| DESCRIPTOR_SET.contains(token))
}

/// Validate a dish name for saving
pub fn validate_dish_name(name: &str) -> Result<String, LibraryError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(LibraryError::InvalidDishName("empty".to_string()));
    }

    if trimmed.len() > MAX_DISH_NAME_LENGTH {
        return Err(LibraryError::InvalidDishName("too_long".to_string()));
    }

    Ok(trimmed.to_string())
}
