//! Print the shopping list for a set of saved dishes and a library.
//!
//! Usage: `cargo run --example shopping_list [input.json]`
//!
//! The input is `{"dishes": [...], "library": {...}}` with the same shape as
//! the stored rows. Without an argument a built-in sample is used.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::fs;

use pantry::categorizer::ShoppingList;
use pantry::config::LogFormat;
use pantry::dish::SavedDish;
use pantry::library::{build_index, LibraryRow};
use pantry::reconcile::compute_needed;
use pantry::telemetry;

#[derive(Deserialize)]
struct Input {
    dishes: Vec<SavedDish>,
    #[serde(default)]
    library: Option<LibraryRow>,
}

fn sample() -> serde_json::Value {
    json!({
        "dishes": [
            {
                "id": 1,
                "name": "Chicken fried rice",
                "ingredients": ["2 cups cooked rice", "2 chicken breasts, cubed", "1 onion, diced", "2 tbsp soy sauce"],
                "suggested_sides": "Cucumber salad"
            },
            {
                "id": 2,
                "name": "Tomato soup",
                "ingredients": "• 2 lbs tomatoes\n• 1 onion\n• 1/2 cup heavy cream\n• Salt and pepper, to taste"
            }
        ],
        "library": {
            "vegetables": ["onions"],
            "entrees": ["Chicken Breast"],
            "sauces_condiments": ["Soy Sauce"]
        }
    })
}

fn main() -> Result<()> {
    telemetry::init_tracing(LogFormat::Pretty)?;

    let raw = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {path}"))?
        }
        None => sample(),
    };
    let input: Input = serde_json::from_value(raw).context("Unexpected input shape")?;

    let index = build_index(input.library.as_ref());
    let needed = compute_needed(&input.dishes, &index);
    let list = ShoppingList::from_needed(&needed);

    println!("{} needed across {} dishes", needed.len(), input.dishes.len());
    for (category, items) in list.iter() {
        println!("\n{category} ({})", items.len());
        for item in items {
            println!("  - {item}");
        }
    }

    Ok(())
}
