//! # Category Classifier
//!
//! Groups needed items into shopping-list buckets by keyword. Presentation
//! only: the bucket never influences whether an item is needed.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::reconcile::NeededItems;

/// Shopping-list bucket, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShoppingCategory {
    Dairy,
    Breads,
    GrainsAndPasta,
    Proteins,
    SaucesCondiments,
    NonPerishable,
    Produce,
    Other,
}

impl ShoppingCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ShoppingCategory::Dairy => "Dairy",
            ShoppingCategory::Breads => "Breads",
            ShoppingCategory::GrainsAndPasta => "Grains & Pasta",
            ShoppingCategory::Proteins => "Proteins",
            ShoppingCategory::SaucesCondiments => "Sauces/Condiments",
            ShoppingCategory::NonPerishable => "Non-Perishable",
            ShoppingCategory::Produce => "Produce",
            ShoppingCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ShoppingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ShoppingCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

lazy_static! {
    /// Checked in order; the first matching rule wins
    static ref CATEGORY_RULES: Vec<(ShoppingCategory, Regex)> = vec![
        (ShoppingCategory::Dairy, rule(r"milk|cheese|butter|yogurt|cream|parmesan|mozzarella|feta")),
        (ShoppingCategory::Breads, rule(r"bread|bun|roll|tortilla|bagel|pita|baguette|naan|croissant")),
        (ShoppingCategory::GrainsAndPasta, rule(r"rice|pasta|noodle|spaghetti|penne|macaroni|quinoa|oat|couscous|barley|flour")),
        (ShoppingCategory::Proteins, rule(r"chicken|beef|pork|turkey|fish|salmon|tuna|shrimp|egg|tofu|lamb|bacon|sausage|ham")),
        (ShoppingCategory::SaucesCondiments, rule(r"sauce|ketchup|mustard|mayo|vinegar|dressing|salsa|soy|oil|honey|syrup")),
        (ShoppingCategory::NonPerishable, rule(r"can|bean|lentil|broth|stock|sugar|salt|spice|baking|nut|chickpea")),
        (ShoppingCategory::Produce, rule(r"onion|garlic|tomato|pepper|lettuce|spinach|carrot|potato|celery|apple|lemon|lime|herb|basil|cilantro|parsley|mushroom|zucchini|cucumber|avocado|broccoli|kale|ginger")),
    ];
}

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Category keyword pattern should be valid")
}

/// Bucket for a needed item's display name
pub fn classify(display_name: &str) -> ShoppingCategory {
    let lowered = display_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(&lowered))
        .map(|(category, _)| *category)
        .unwrap_or(ShoppingCategory::Other)
}

/// Needed items grouped by bucket, each bucket sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShoppingList {
    groups: BTreeMap<ShoppingCategory, Vec<String>>,
}

impl ShoppingList {
    pub fn from_needed(needed: &NeededItems) -> Self {
        let mut groups: BTreeMap<ShoppingCategory, Vec<String>> = BTreeMap::new();
        for item in needed.iter() {
            groups
                .entry(classify(&item.display_name))
                .or_default()
                .push(item.display_name.clone());
        }
        for items in groups.values_mut() {
            items.sort();
        }
        Self { groups }
    }

    pub fn get(&self, category: ShoppingCategory) -> Option<&[String]> {
        self.groups.get(&category).map(Vec::as_slice)
    }

    /// Non-empty buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (ShoppingCategory, &[String])> + '_ {
        self.groups
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(classify("Rice"), ShoppingCategory::GrainsAndPasta);
        assert_eq!(classify("Butter"), ShoppingCategory::Dairy);
        // Dairy is checked before Produce
        assert_eq!(classify("Cream Of Mushroom"), ShoppingCategory::Dairy);
        assert_eq!(classify("Peanut Butter"), ShoppingCategory::Dairy);
        assert_eq!(classify("Soy Sauce"), ShoppingCategory::SaucesCondiments);
        assert_eq!(classify("Salt"), ShoppingCategory::NonPerishable);
        assert_eq!(classify("Pepper"), ShoppingCategory::Produce);
        assert_eq!(classify("Eggs"), ShoppingCategory::Proteins);
        assert_eq!(classify("Whisk"), ShoppingCategory::Other);
    }

    #[test]
    fn test_shopping_list_groups_and_sorts() {
        let mut needed = NeededItems::new();
        for name in ["spinach", "milk", "garlic", "cheddar cheese"] {
            needed.insert(name);
        }
        let list = ShoppingList::from_needed(&needed);
        assert_eq!(list.get(ShoppingCategory::Produce), Some(&["Garlic".to_string(), "Spinach".to_string()][..]));
        assert_eq!(list.get(ShoppingCategory::Dairy).map(<[String]>::len), Some(2));
        assert_eq!(list.total(), 4);
        assert_eq!(list.iter().next().map(|(category, _)| category), Some(ShoppingCategory::Dairy));
    }

    #[test]
    fn test_serializes_with_labels() {
        let mut needed = NeededItems::new();
        needed.insert("pasta");
        let json = serde_json::to_value(ShoppingList::from_needed(&needed)).unwrap();
        assert_eq!(json, serde_json::json!({"Grains & Pasta": ["Pasta"]}));
    }
}
