//! # Measurement Patterns Module
//!
//! Regex patterns and closed word lists used to strip quantities, units and
//! preparation descriptors from free-text ingredient lines.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Leading quantity followed by an optional unit token.
///
/// The quantity must start with a digit or a vulgar fraction so a bare unit
/// word ("cups flour") is left alone. The unit must end on a word boundary
/// so "can" never eats "canola" and "l" never eats "lemon".
pub const MEASUREMENT_PREFIX_PATTERN: &str = r#"(?i)^[\d½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞][\d½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞\s/.,\-–]*(?:(?:cups|cup|tablespoons|tablespoon|tbsp|tbs|teaspoons|teaspoon|tsp|ounces|ounce|fl oz|oz|pounds|pound|lbs|lb|grams|gram|g|kilograms|kilogram|kg|milliliters|milliliter|ml|liters|liter|l|quarts|quart|pints|pint|cloves|clove|cans|can|jars|jar|packages|package|pkg|sticks|stick|slices|slice|pieces|piece|pinches|pinch|dashes|dash|bunches|bunch|heads|head|sprigs|sprig|handfuls|handful)\b\.?)?\s*"#;

/// Bullet characters a generator or a user may put in front of a line.
pub const BULLET_PATTERN: &str = r#"^[\s•·\-*–—▪◦●○>]+"#;

/// Parenthetical asides such as "(about 2 cups)".
pub const PARENTHETICAL_PATTERN: &str = r#"\([^)]*\)?"#;

/// Preparation and size words dropped from the primary clause.
pub const DESCRIPTOR_WORDS: &[&str] = &[
    "chopped", "fresh", "freshly", "finely", "coarsely", "roughly", "thinly", "diced", "minced",
    "sliced", "grated", "shredded", "crushed", "optional", "softened", "melted", "peeled",
    "seeded", "divided", "to", "taste", "room", "temperature", "extra", "virgin", "drained",
    "rinsed", "small", "medium", "large", "about", "plus", "more", "for", "serving", "packed",
    "cubed", "trimmed",
];

lazy_static! {
    pub static ref MEASUREMENT_PREFIX_REGEX: Regex = Regex::new(MEASUREMENT_PREFIX_PATTERN)
        .expect("Measurement prefix pattern should be valid");
    pub static ref BULLET_REGEX: Regex =
        Regex::new(BULLET_PATTERN).expect("Bullet pattern should be valid");
    pub static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(PARENTHETICAL_PATTERN).expect("Parenthetical pattern should be valid");
    pub static ref DESCRIPTOR_SET: HashSet<&'static str> =
        DESCRIPTOR_WORDS.iter().copied().collect();
}
