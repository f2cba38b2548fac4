use pantry::alerts::{AlertEvent, AlertState, NeededAlert};
use pantry::bot::commands::{parse_command, Command, CommandError};
use pantry::bot::ui_builder::{
    format_command_error, format_help, format_needed_count, format_new_items_alert,
    format_shopping_list, format_welcome,
};
use pantry::categorizer::ShoppingList;
use pantry::dish::SavedDish;
use pantry::library::{Library, LibraryIndex};
use pantry::localization::init_localization;
use pantry::reconcile::compute_needed;
use serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() {
        // Initialize localization if not already done
        let _ = init_localization();
    }

    /// Dish built the way the handler stores a `/save` command
    fn dish_from_command(id: i64, text: &str) -> SavedDish {
        match parse_command(text) {
            Ok(Command::Save { name, ingredients }) => SavedDish::new(
                id,
                Value::Array(ingredients.into_iter().map(Value::String).collect()),
            )
            .with_name(&name),
            other => panic!("expected a save command, got {:?}", other),
        }
    }

    /// Test a chat session: save dishes, stock the library, follow the badge
    #[test]
    fn test_chat_flow() {
        setup_localization();
        let mut library = Library::default();
        let mut alert = NeededAlert::new();
        let mut dishes = vec![dish_from_command(
            1,
            "/save Chili\n1 lb ground beef\n1 can kidney beans\n1 onion, chopped",
        )];

        let needed = compute_needed(&dishes, &LibraryIndex::build(&library));
        assert_eq!(needed.len(), 3);
        assert_eq!(alert.observe(needed.len()), None);

        for text in ["/add produce onions", "/add proteins Ground Beef"] {
            let Ok(Command::Add { category, item }) = parse_command(text) else {
                panic!("expected an add command");
            };
            assert!(library.add_item(category, &item).unwrap());
        }
        let needed = compute_needed(&dishes, &LibraryIndex::build(&library));
        assert_eq!(needed.display_names(), vec!["Kidney Beans"]);
        assert_eq!(alert.observe(needed.len()), None);
        assert_eq!(alert.state(), AlertState::Idle);

        dishes.push(dish_from_command(2, "/save Garlic bread\nbaguette\n2 cloves garlic"));
        let needed = compute_needed(&dishes, &LibraryIndex::build(&library));
        let event = alert.observe(needed.len());
        assert_eq!(event, Some(AlertEvent::NewItemsNeeded { added: 2, total: 3 }));
        assert!(format_new_items_alert(2, 3, Some("en")).contains("3 in total"));

        let text = format_shopping_list(&ShoppingList::from_needed(&needed), Some("en"));
        assert!(text.contains("• Baguette"));
        assert!(text.contains("• Garlic"));
        assert!(text.contains("• Kidney Beans"));

        alert.acknowledge();
        assert_eq!(alert.state(), AlertState::Idle);
    }

    /// Test the canned replies in both languages
    #[test]
    fn test_static_replies() {
        setup_localization();

        assert!(format_welcome(Some("en")).contains("Pantry Bot"));
        assert!(format_welcome(Some("fr")).contains("Bienvenue"));
        assert!(format_help(None).contains("/shopping"));
        assert!(format_needed_count(1, Some("fr")).contains('1'));
    }

    /// Test that usage errors point at the right command
    #[test]
    fn test_usage_errors() {
        setup_localization();

        let add = parse_command("/add").unwrap_err();
        assert_eq!(add, CommandError::Usage("add"));
        assert!(format_command_error(&add, None).contains("/add"));

        let remove = parse_command("/remove dairy").unwrap_err();
        assert!(format_command_error(&remove, None).contains("/remove"));
    }
}
