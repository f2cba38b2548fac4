//! # Reconciliation Engine
//!
//! Computes the ingredients saved dishes require that the user's library does
//! not cover. The result is a derived view, recomputed from scratch on every
//! call and never persisted.
//!
//! ```rust
//! use pantry::dish::SavedDish;
//! use pantry::library::{build_index, LibraryRow};
//! use pantry::reconcile::compute_needed;
//! use serde_json::json;
//!
//! let library = LibraryRow {
//!     produce: Some(vec!["Onions".to_string()]),
//!     ..Default::default()
//! };
//! let dishes = vec![SavedDish::new(1, json!(["1 onion, diced", "1 cup rice"]))];
//!
//! let needed = compute_needed(&dishes, &build_index(Some(&library)));
//! assert_eq!(needed.display_names(), vec!["Rice"]);
//! ```

use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::dish::SavedDish;
use crate::fuzzy::matches;
use crate::library::LibraryIndex;
use crate::normalizer::{format_for_display, normalize_value};

/// One ingredient missing from the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeededItem {
    /// Normalized (lowercase) name used for matching
    pub key: String,
    /// Title-cased name shown to the user
    pub display_name: String,
}

/// Needed items in first-seen order, fuzzy-deduplicated
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NeededItems {
    items: Vec<NeededItem>,
}

impl NeededItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a normalized candidate unless it fuzzy-matches an item already
    /// collected. The first display form seen wins.
    pub fn insert(&mut self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        if let Some(existing) = self.items.iter().find(|item| matches(&item.key, candidate)) {
            trace!("'{}' collapses into needed item '{}'", candidate, existing.display_name);
            return false;
        }
        self.items.push(NeededItem {
            key: candidate.to_string(),
            display_name: format_for_display(candidate),
        });
        true
    }

    /// Badge count
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NeededItem> {
        self.items.iter()
    }

    /// Display names in first-seen order
    pub fn display_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.display_name.as_str()).collect()
    }

    /// Whether any needed item fuzzy-matches `name`
    pub fn contains_match(&self, name: &str) -> bool {
        self.items.iter().any(|item| matches(&item.key, name))
    }

    /// Normalized key to display name
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.items
            .iter()
            .map(|item| (item.key.clone(), item.display_name.clone()))
            .collect()
    }
}

/// Whether the library already covers a normalized candidate
pub fn is_in_library(candidate: &str, index: &LibraryIndex) -> bool {
    index.contains_exact(candidate)
        || index.flat_list().iter().any(|entry| matches(candidate, entry))
}

/// Compute the needed set for the given saved dishes against a library index.
///
/// An empty index means the user has no library configured, so every
/// ingredient is needed.
pub fn compute_needed(dishes: &[SavedDish], index: &LibraryIndex) -> NeededItems {
    let mut needed = NeededItems::new();
    let library_configured = !index.is_empty();

    for dish in dishes {
        for entry in dish.all_entries() {
            let candidate = normalize_value(&entry);
            if candidate.is_empty() {
                continue;
            }
            if library_configured && is_in_library(&candidate, index) {
                trace!("'{}' found in library", candidate);
                continue;
            }
            needed.insert(&candidate);
        }
    }

    debug!(
        "Reconciled {} dishes against {} library entries: {} needed",
        dishes.len(),
        index.len(),
        needed.len()
    );
    needed
}

/// Badge count of needed items
pub fn needed_count(dishes: &[SavedDish], index: &LibraryIndex) -> usize {
    compute_needed(dishes, index).len()
}
