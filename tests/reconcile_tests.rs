//! # Reconciliation Tests
//!
//! End-to-end checks from saved-dish payloads through the library index to
//! the grouped shopping list.

use pantry::categorizer::{ShoppingCategory, ShoppingList};
use pantry::dish::SavedDish;
use pantry::library::{build_index, LibraryCategory, LibraryRow};
use pantry::reconcile::{compute_needed, is_in_library, needed_count};
use serde_json::json;

fn empty_library() -> LibraryRow {
    LibraryRow {
        seasonings: Some(vec![]),
        produce: Some(vec![]),
        proteins: Some(vec![]),
        ..Default::default()
    }
}

#[test]
fn test_library_covers_all_but_rice() {
    let library = LibraryRow {
        produce: Some(vec!["Onions".to_string()]),
        proteins: Some(vec!["Chicken Breast".to_string()]),
        ..Default::default()
    };
    let dishes = vec![SavedDish::new(
        1,
        json!(["1 onion, diced", "2 chicken breasts", "1 cup rice"]),
    )];

    let needed = compute_needed(&dishes, &build_index(Some(&library)));
    assert_eq!(needed.display_names(), vec!["Rice"]);

    let list = ShoppingList::from_needed(&needed);
    assert_eq!(list.get(ShoppingCategory::GrainsAndPasta), Some(&["Rice".to_string()][..]));
    assert_eq!(list.total(), 1);
}

#[test]
fn test_empty_library_needs_everything() {
    let dishes = vec![SavedDish::new(1, json!(["Salt", "Pepper"]))];

    let needed = compute_needed(&dishes, &build_index(Some(&empty_library())));
    assert_eq!(needed.display_names(), vec!["Salt", "Pepper"]);

    let missing_row = compute_needed(&dishes, &build_index(None));
    assert_eq!(missing_row, needed);
}

#[test]
fn test_empty_library_includes_every_non_empty_ingredient() {
    let dishes = vec![
        SavedDish::new(1, json!(["1 cup rice", "", "2 carrots", null]))
            .with_sides(json!(["Green salad"])),
        SavedDish::new(2, json!("Basil\nMozzarella\n\n")),
    ];
    let index = build_index(None);
    let needed = compute_needed(&dishes, &index);

    for name in ["rice", "carrots", "green salad", "basil", "mozzarella"] {
        assert!(needed.contains_match(name), "missing '{}'", name);
    }
    assert_eq!(needed.len(), 5);
    assert_eq!(needed_count(&dishes, &index), 5);
}

#[test]
fn test_bare_string_line_keeps_only_primary_clause() {
    let dishes = vec![SavedDish::new(1, json!("2 cups chopped fresh spinach, divided"))];
    let needed = compute_needed(&dishes, &build_index(None));
    assert_eq!(needed.display_names(), vec!["Spinach"]);

    let dishes = vec![SavedDish::new(2, json!("salt, black pepper, to taste"))];
    let needed = compute_needed(&dishes, &build_index(None));
    assert_eq!(needed.display_names(), vec!["Salt", "Black Pepper"]);
}

#[test]
fn test_tomato_variants_deduplicate() {
    let dishes = vec![
        SavedDish::new(1, json!(["2 tomatoes, diced"])),
        SavedDish::new(2, json!(["1 tomato"])),
    ];
    let needed = compute_needed(&dishes, &build_index(None));
    assert_eq!(needed.display_names(), vec!["Tomatoes"]);
}

#[test]
fn test_garlic_keeps_first_seen_form() {
    let library = LibraryRow {
        dairy: Some(vec!["Butter".to_string()]),
        ..Default::default()
    };
    let dishes = vec![
        SavedDish::new(1, json!(["Garlic Cloves"])),
        SavedDish::new(2, json!(["3 cloves garlic, minced"])),
    ];

    let needed = compute_needed(&dishes, &build_index(Some(&library)));
    assert_eq!(needed.len(), 1);
    assert_eq!(needed.display_names(), vec!["Garlic Cloves"]);
    assert!(needed.contains_match("garlic"));
}

#[test]
fn test_legacy_category_names_still_match() {
    let library = LibraryRow {
        vegetables: Some(vec!["carrots".to_string()]),
        entrees: Some(vec!["salmon".to_string()]),
        ..Default::default()
    };
    let index = build_index(Some(&library));
    assert!(is_in_library("carrot", &index));
    assert!(is_in_library("salmon fillets", &index));
    assert!(!is_in_library("rice", &index));
}

#[test]
fn test_object_payloads_and_sides() {
    let library = LibraryRow {
        grains: Some(vec!["Rice".to_string()]),
        ..Default::default()
    };
    let dishes = vec![SavedDish::new(
        7,
        json!([{"name": "2 cups basmati rice"}, {"title": "1 lime"}]),
    )
    .with_sides(json!("naan, mango chutney"))];

    let needed = compute_needed(&dishes, &build_index(Some(&library)));
    assert_eq!(needed.display_names(), vec!["Lime", "Naan", "Mango Chutney"]);

    let list = ShoppingList::from_needed(&needed);
    assert_eq!(list.get(ShoppingCategory::Produce), Some(&["Lime".to_string()][..]));
    assert_eq!(list.get(ShoppingCategory::Breads), Some(&["Naan".to_string()][..]));
    assert_eq!(list.get(ShoppingCategory::Other), Some(&["Mango Chutney".to_string()][..]));
}

#[test]
fn test_no_dishes_means_nothing_needed() {
    let library = LibraryRow {
        produce: Some(vec!["Onions".to_string()]),
        ..Default::default()
    };
    let needed = compute_needed(&[], &build_index(Some(&library)));
    assert!(needed.is_empty());
    assert!(ShoppingList::from_needed(&needed).is_empty());
}

#[test]
fn test_category_names_round_trip_through_parse() {
    for category in LibraryCategory::ALL {
        assert_eq!(category.as_str().parse::<LibraryCategory>().ok(), Some(category));
    }
}
