//! # Library Index
//!
//! A user's pantry library, categorized, and the flat index the
//! reconciliation engine searches.
//!
//! Persisted rows are duck-typed: every category is optional and two
//! categories have legacy names (`vegetables` for `produce`, `entrees` for
//! `proteins`). [`Library::from_row`] resolves those aliases once, at the
//! boundary, so matching code only ever sees [`Library`].

use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::errors::LibraryError;
use crate::normalizer::format_for_display;

/// Fixed set of library categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryCategory {
    Seasonings,
    Produce,
    Proteins,
    Pastas,
    Equipment,
    Grains,
    Breads,
    SaucesCondiments,
    Dairy,
    NonPerishables,
}

impl LibraryCategory {
    pub const ALL: [LibraryCategory; 10] = [
        LibraryCategory::Seasonings,
        LibraryCategory::Produce,
        LibraryCategory::Proteins,
        LibraryCategory::Pastas,
        LibraryCategory::Equipment,
        LibraryCategory::Grains,
        LibraryCategory::Breads,
        LibraryCategory::SaucesCondiments,
        LibraryCategory::Dairy,
        LibraryCategory::NonPerishables,
    ];

    /// Column / field name used by persisted rows
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryCategory::Seasonings => "seasonings",
            LibraryCategory::Produce => "produce",
            LibraryCategory::Proteins => "proteins",
            LibraryCategory::Pastas => "pastas",
            LibraryCategory::Equipment => "equipment",
            LibraryCategory::Grains => "grains",
            LibraryCategory::Breads => "breads",
            LibraryCategory::SaucesCondiments => "sauces_condiments",
            LibraryCategory::Dairy => "dairy",
            LibraryCategory::NonPerishables => "non_perishables",
        }
    }
}

impl fmt::Display for LibraryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryCategory {
    type Err = LibraryError;

    /// Accepts field names plus the legacy aliases and a few spellings users type
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' ', '/'], "_");
        let category = match key.as_str() {
            "seasonings" | "seasoning" | "spices" => LibraryCategory::Seasonings,
            "produce" | "vegetables" => LibraryCategory::Produce,
            "proteins" | "protein" | "entrees" => LibraryCategory::Proteins,
            "pastas" | "pasta" => LibraryCategory::Pastas,
            "equipment" => LibraryCategory::Equipment,
            "grains" | "grain" => LibraryCategory::Grains,
            "breads" | "bread" => LibraryCategory::Breads,
            "sauces_condiments" | "sauces" | "condiments" => LibraryCategory::SaucesCondiments,
            "dairy" => LibraryCategory::Dairy,
            "non_perishables" | "nonperishables" | "pantry" => LibraryCategory::NonPerishables,
            _ => return Err(LibraryError::UnknownCategory(s.trim().to_string())),
        };
        Ok(category)
    }
}

/// A library record as persisted, legacy fields included
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produce: Option<Vec<String>>,
    /// Legacy name of `produce`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proteins: Option<Vec<String>>,
    /// Legacy name of `proteins`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pastas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breads: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauces_condiments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dairy: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_perishables: Option<Vec<String>>,
}

impl LibraryRow {
    /// Items stored for a category, resolving legacy aliases
    pub fn resolved(&self, category: LibraryCategory) -> Option<&[String]> {
        let items = match category {
            LibraryCategory::Seasonings => &self.seasonings,
            LibraryCategory::Produce => {
                return self.produce.as_deref().or(self.vegetables.as_deref());
            }
            LibraryCategory::Proteins => {
                return self.proteins.as_deref().or(self.entrees.as_deref());
            }
            LibraryCategory::Pastas => &self.pastas,
            LibraryCategory::Equipment => &self.equipment,
            LibraryCategory::Grains => &self.grains,
            LibraryCategory::Breads => &self.breads,
            LibraryCategory::SaucesCondiments => &self.sauces_condiments,
            LibraryCategory::Dairy => &self.dairy,
            LibraryCategory::NonPerishables => &self.non_perishables,
        };
        items.as_deref()
    }

    fn slot_mut(&mut self, category: LibraryCategory) -> &mut Option<Vec<String>> {
        match category {
            LibraryCategory::Seasonings => &mut self.seasonings,
            LibraryCategory::Produce => &mut self.produce,
            LibraryCategory::Proteins => &mut self.proteins,
            LibraryCategory::Pastas => &mut self.pastas,
            LibraryCategory::Equipment => &mut self.equipment,
            LibraryCategory::Grains => &mut self.grains,
            LibraryCategory::Breads => &mut self.breads,
            LibraryCategory::SaucesCondiments => &mut self.sauces_condiments,
            LibraryCategory::Dairy => &mut self.dairy,
            LibraryCategory::NonPerishables => &mut self.non_perishables,
        }
    }
}

/// Resolved, display-formatted library
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Library {
    categories: BTreeMap<LibraryCategory, Vec<String>>,
}

impl Library {
    /// Resolve legacy aliases and apply the display invariants to every category
    pub fn from_row(row: &LibraryRow) -> Self {
        let categories = LibraryCategory::ALL
            .iter()
            .map(|&category| {
                let items = row.resolved(category).unwrap_or_default();
                (category, tidy_entries(items))
            })
            .collect();
        Self { categories }
    }

    pub fn items(&self, category: LibraryCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Non-empty categories with their items, in category order
    pub fn iter(&self) -> impl Iterator<Item = (LibraryCategory, &[String])> + '_ {
        self.categories
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(category, items)| (*category, items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add an item to a category. Returns `Ok(false)` when an equal item
    /// (case-insensitive) is already there.
    pub fn add_item(&mut self, category: LibraryCategory, item: &str) -> Result<bool, LibraryError> {
        let display = format_for_display(item);
        if display.is_empty() {
            return Err(LibraryError::EmptyItem);
        }
        let items = self.categories.entry(category).or_default();
        let key = display.to_lowercase();
        if items.iter().any(|existing| existing.to_lowercase() == key) {
            debug!("Library item '{}' already present in {}", display, category);
            return Ok(false);
        }
        items.push(display);
        items.sort_by(|a, b| display_order(a, b));
        Ok(true)
    }

    /// Remove an item (case-insensitive). Returns whether anything was removed.
    pub fn remove_item(&mut self, category: LibraryCategory, item: &str) -> bool {
        let key = format_for_display(item).to_lowercase();
        let Some(items) = self.categories.get_mut(&category) else {
            return false;
        };
        let before = items.len();
        items.retain(|existing| existing.to_lowercase() != key);
        before != items.len()
    }

    /// Persistable form; legacy fields are left unset
    pub fn to_row(&self) -> LibraryRow {
        let mut row = LibraryRow::default();
        for category in LibraryCategory::ALL {
            *row.slot_mut(category) = Some(self.items(category).to_vec());
        }
        row
    }
}

/// Display-format, drop empties, dedupe case-insensitively (first wins), sort
fn tidy_entries(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tidy: Vec<String> = items
        .iter()
        .map(|item| format_for_display(item))
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect();
    tidy.sort_by(|a, b| display_order(a, b));
    tidy
}

/// Case-insensitive ordering, ties broken by the raw string
fn display_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Flat, searchable view over a library
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    flat_list: Vec<String>,
    normalized_set: HashSet<String>,
}

impl LibraryIndex {
    pub fn build(library: &Library) -> Self {
        let flat_list: Vec<String> = library
            .iter()
            .flat_map(|(_, items)| items.iter().cloned())
            .collect();
        let normalized_set = flat_list
            .iter()
            .map(|item| item.trim().to_lowercase())
            .collect();
        debug!("Built library index with {} entries", flat_list.len());
        Self {
            flat_list,
            normalized_set,
        }
    }

    /// Display-formatted entries across all categories
    pub fn flat_list(&self) -> &[String] {
        &self.flat_list
    }

    /// Exact membership of an already-lowercased name
    pub fn contains_exact(&self, normalized: &str) -> bool {
        self.normalized_set.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.flat_list.len()
    }

    /// An empty index means "no library configured": everything is needed
    pub fn is_empty(&self) -> bool {
        self.flat_list.is_empty()
    }
}

/// Build the index for a user's row; a missing row gives an empty index
pub fn build_index(row: Option<&LibraryRow>) -> LibraryIndex {
    match row {
        Some(row) => LibraryIndex::build(&Library::from_row(row)),
        None => LibraryIndex::default(),
    }
}
