//! Parsing of chat commands into typed requests

use crate::dish::validate_dish_name;
use crate::errors::LibraryError;
use crate::library::LibraryCategory;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Needed,
    Shopping,
    Library,
    Add { category: LibraryCategory, item: String },
    Remove { category: LibraryCategory, item: String },
    Save { name: String, ingredients: Vec<String> },
    Cooked { name: String },
    Unknown,
}

/// Why a recognized command could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// `/add`, `/remove` or `/cooked` missing its arguments
    Usage(&'static str),
    Invalid(LibraryError),
}

impl From<LibraryError> for CommandError {
    fn from(err: LibraryError) -> Self {
        CommandError::Invalid(err)
    }
}

/// Parse a message text. Commands may carry a `@BotName` suffix.
pub fn parse_command(text: &str) -> Result<Command, CommandError> {
    let mut lines = text.trim().lines();
    let first_line = lines.next().unwrap_or_default().trim();
    let (head, rest) = first_line
        .split_once(char::is_whitespace)
        .map(|(head, rest)| (head, rest.trim()))
        .unwrap_or((first_line, ""));
    let command = head.split('@').next().unwrap_or_default().to_lowercase();

    let parsed = match command.as_str() {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/needed" => Command::Needed,
        "/shopping" => Command::Shopping,
        "/library" => Command::Library,
        "/add" => {
            let (category, item) = category_and_item(rest, "add")?;
            Command::Add { category, item }
        }
        "/remove" => {
            let (category, item) = category_and_item(rest, "remove")?;
            Command::Remove { category, item }
        }
        "/save" => {
            let name = validate_dish_name(rest)?;
            let ingredients: Vec<String> = lines
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            if ingredients.is_empty() {
                return Err(LibraryError::NoIngredients.into());
            }
            Command::Save { name, ingredients }
        }
        "/cooked" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("cooked"));
            }
            Command::Cooked {
                name: rest.to_string(),
            }
        }
        _ => Command::Unknown,
    };
    Ok(parsed)
}

fn category_and_item(rest: &str, usage: &'static str) -> Result<(LibraryCategory, String), CommandError> {
    let (category, item) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandError::Usage(usage))?;
    let item = item.trim();
    if item.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    let category = category.parse::<LibraryCategory>()?;
    Ok((category, item.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("/start").unwrap(), Command::Start);
        assert_eq!(parse_command("/help@PantryBot").unwrap(), Command::Help);
        assert_eq!(parse_command("  /NEEDED ").unwrap(), Command::Needed);
        assert_eq!(parse_command("hello").unwrap(), Command::Unknown);
    }

    #[test]
    fn test_add_and_remove() {
        assert_eq!(
            parse_command("/add produce red onions").unwrap(),
            Command::Add {
                category: LibraryCategory::Produce,
                item: "red onions".to_string()
            }
        );
        assert_eq!(
            parse_command("/remove vegetables carrots").unwrap(),
            Command::Remove {
                category: LibraryCategory::Produce,
                item: "carrots".to_string()
            }
        );
        assert_eq!(parse_command("/add produce"), Err(CommandError::Usage("add")));
        assert_eq!(parse_command("/remove"), Err(CommandError::Usage("remove")));
        assert_eq!(parse_command("/cooked  "), Err(CommandError::Usage("cooked")));
        assert_eq!(
            parse_command("/cooked Weeknight Curry").unwrap(),
            Command::Cooked {
                name: "Weeknight Curry".to_string()
            }
        );
        assert_eq!(
            parse_command("/add toys yo-yo"),
            Err(CommandError::Invalid(LibraryError::UnknownCategory("toys".to_string())))
        );
    }

    #[test]
    fn test_save() {
        let parsed = parse_command("/save Weeknight Curry\n- 1 onion, diced\n\n2 cups rice").unwrap();
        assert_eq!(
            parsed,
            Command::Save {
                name: "Weeknight Curry".to_string(),
                ingredients: vec!["- 1 onion, diced".to_string(), "2 cups rice".to_string()],
            }
        );
        assert_eq!(
            parse_command("/save Curry"),
            Err(CommandError::Invalid(LibraryError::NoIngredients))
        );
        assert!(matches!(
            parse_command("/save\n1 onion"),
            Err(CommandError::Invalid(LibraryError::InvalidDishName(_)))
        ));
    }
}
