//! # Error Types Module
//!
//! Typed errors for user-supplied library and dish input. The matching core
//! itself never fails; storage and transport failures travel as
//! `anyhow::Error`.

/// Errors raised while validating library or dish edits
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// Category name not in the fixed library category set
    UnknownCategory(String),
    /// Item name empty after formatting
    EmptyItem,
    /// Dish name missing or too long
    InvalidDishName(String),
    /// Dish submitted without any ingredient lines
    NoIngredients,
    /// Persistence failure while applying the edit
    Storage(String),
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryError::UnknownCategory(name) => write!(f, "Unknown library category: {name}"),
            LibraryError::EmptyItem => write!(f, "Library item name is empty"),
            LibraryError::InvalidDishName(reason) => write!(f, "Invalid dish name: {reason}"),
            LibraryError::NoIngredients => write!(f, "Dish has no ingredients"),
            LibraryError::Storage(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<anyhow::Error> for LibraryError {
    fn from(err: anyhow::Error) -> Self {
        LibraryError::Storage(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let unknown = LibraryError::UnknownCategory("toys".to_string());
        assert_eq!(unknown.to_string(), "Unknown library category: toys");
        assert!(LibraryError::EmptyItem.to_string().contains("empty"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: LibraryError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err, LibraryError::Storage("connection refused".to_string()));
    }

    #[test]
    fn test_from_anyhow_keeps_cause_chain() {
        let err: LibraryError = anyhow::anyhow!("connection refused")
            .context("Failed to lock library row")
            .into();
        assert_eq!(
            err,
            LibraryError::Storage("Failed to lock library row: connection refused".to_string())
        );
    }
}
