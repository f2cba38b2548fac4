//! # Fuzzy Matcher
//!
//! Case- and plural-insensitive, substring-permissive equivalence between two
//! ingredient names.
//!
//! The substring rule favours recall: `"pea"` matches both `"peas"` and
//! `"peanut"`, and `"rice"` matches `"price"`. Callers relying on exact
//! identity must not use this module.

/// Lowercase, trim and strip a single trailing `s`.
///
/// The `s` is kept when removing it would leave nothing.
pub fn singularize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => lowered,
    }
}

/// Whether two ingredient names refer to the same thing.
///
/// Both sides are reduced with [`singularize`]; they match when equal or when
/// either contains the other. An empty name is contained in every name, so
/// callers filter empty candidates before matching.
///
/// ```rust
/// use pantry::fuzzy::matches;
///
/// assert!(matches("Tomatoes", "tomato"));
/// assert!(matches("Tomato Sauce", "Tomato"));
/// assert!(!matches("salt", "pepper"));
/// ```
pub fn matches(a: &str, b: &str) -> bool {
    let left = singularize(a);
    let right = singularize(b);
    left == right || left.contains(&right) || right.contains(&left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("Tomatoes"), "tomatoe");
        assert_eq!(singularize(" Onions "), "onion");
        assert_eq!(singularize("s"), "s");
        assert_eq!(singularize("rice"), "rice");
    }

    #[test]
    fn test_plural_and_case_insensitive() {
        assert!(matches("Tomatoes", "Tomato"));
        assert!(matches("onion", "ONIONS"));
        assert!(matches("chicken breasts", "Chicken Breast"));
    }

    #[test]
    fn test_substring_policy_is_permissive() {
        assert!(matches("Tomato Sauce", "Tomato"));
        assert!(matches("pea", "peanut"));
        assert!(matches("rice", "price"));
        assert!(matches("garlic cloves", "garlic"));
    }

    #[test]
    fn test_non_matches() {
        assert!(!matches("salt", "pepper"));
        assert!(!matches("basil", "oregano"));
    }

    #[test]
    fn test_empty_names_are_contained_in_anything() {
        assert!(matches("", "salt"));
        assert!(matches("   ", &"   ".to_uppercase()));
    }

    #[test]
    fn test_self_match_ignores_case() {
        for name in ["Basil", "feta cheese", "s", "Ω-3 oil"] {
            assert!(matches(name, &name.to_uppercase()));
        }
    }
}
