use crate::application::{App, AppMode, FormField, Tab, TextInput};
use crate::error::AppError;
use crate::infrastructure::LedgerExporter;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Searching => Self::handle_search_mode(app, key),
            AppMode::Registering => Self::handle_registering_mode(app, key),
            AppMode::Details => Self::handle_details_mode(app, key),
            AppMode::Transferring => Self::handle_transfer_mode(app, key),
            AppMode::ExportCsv => Self::handle_export_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => app.previous_tab(),
            KeyCode::Tab => app.next_tab(),
            KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                if let Some(tab) = Tab::from_index(index) {
                    app.select_tab(tab);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Enter => match app.active_tab {
                Tab::Search => app.open_details(),
                Tab::Register => app.start_registration(),
                Tab::Transactions | Tab::Analytics => {}
            },
            KeyCode::Char('e') => app.start_export(),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            KeyCode::Esc => {
                app.status_message = None;
            }
            _ => {}
        }
    }

    fn handle_search_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Down => app.select_next(),
            KeyCode::Up => app.select_previous(),
            _ => {
                if Self::edit_text(app.search_input_mut(), key) {
                    // Live filtering: the list shrinks as the user types
                    match app.active_tab {
                        Tab::Transactions => app.selected_transaction = 0,
                        _ => app.selected_property = 0,
                    }
                    app.clamp_selection();
                }
            }
        }
    }

    fn handle_registering_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc => app.cancel_registration(),
            KeyCode::Enter => app.submit_registration(),
            KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.form.focus_previous(),
            _ if app.form.focused == FormField::PropertyType => match key {
                KeyCode::Right | KeyCode::Char(' ') => app.form.cycle_property_type(true),
                KeyCode::Left => app.form.cycle_property_type(false),
                _ => {}
            },
            _ => {
                if let Some(input) = app.form.focused_input_mut() {
                    Self::edit_text(input, key);
                }
            }
        }
    }

    fn handle_details_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => app.close_details(),
            KeyCode::Char('t') => app.start_transfer(),
            _ => {}
        }
    }

    fn handle_transfer_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.submit_transfer(),
            KeyCode::Esc => app.cancel_transfer(),
            _ => {
                Self::edit_text(&mut app.transfer_owner, key);
            }
        }
    }

    fn handle_export_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.get_export_filename();
                let result = LedgerExporter::export_transactions(&app.visible_transactions(), &filename)
                    .map_err(AppError::from)
                    .map_err(|err| {
                        warn!(%filename, error = %err, "ledger export failed");
                        err.to_string()
                    });
                app.set_export_result(&filename, result);
            }
            KeyCode::Esc => app.cancel_export(),
            _ => {
                Self::edit_text(&mut app.filename_input, key);
            }
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    /// Applies a line-editing key to `input`. Returns true if the text changed.
    fn edit_text(input: &mut TextInput, key: KeyCode) -> bool {
        match key {
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => {
                input.move_left();
                false
            }
            KeyCode::Right => {
                input.move_right();
                false
            }
            KeyCode::Home => {
                input.move_home();
                false
            }
            KeyCode::End => {
                input.move_end();
                false
            }
            KeyCode::Char(c) => {
                input.insert(c);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{NotificationLevel, UiTimings};
    use crate::domain::{ConfirmationDelays, ManualClock, PropertyStatus, PropertyType, RegistryStore};
    use std::time::Duration;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn seeded_app() -> (App, ManualClock) {
        let clock = ManualClock::new();
        let mut store = RegistryStore::with_clock(ConfirmationDelays::default(), Box::new(clock.clone()));
        store.seed_demo_data();
        (App::new(store, UiTimings::default()), clock)
    }

    #[test]
    fn test_tab_switching() {
        let mut app = App::default();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::Register);

        InputHandler::handle_key_event(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.active_tab, Tab::Search);

        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active_tab, Tab::Analytics);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_tab, Tab::Transactions);

        // wraps around
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::Search);
    }

    #[test]
    fn test_live_search_filters_properties() {
        let (mut app, _clock) = seeded_app();
        assert_eq!(app.visible_properties().len(), 2);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, AppMode::Searching);

        type_text(&mut app, "SARAH");
        assert_eq!(app.visible_properties().len(), 1);
        assert_eq!(app.visible_properties()[0].owner, "Sarah Johnson");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.property_query.as_str(), "SARAH");
        assert_eq!(app.status_message.as_deref(), Some("1 result for 'SARAH'"));
    }

    #[test]
    fn test_search_typing_j_does_not_navigate() {
        let (mut app, _clock) = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "jk");
        assert_eq!(app.property_query.as_str(), "jk");
        assert_eq!(app.selected_property, 0);
    }

    #[test]
    fn test_search_escape_clears_query() {
        let (mut app, _clock) = seeded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz");
        assert!(app.visible_properties().is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.property_query.is_empty());
        assert_eq!(app.visible_properties().len(), 2);
    }

    #[test]
    fn test_transaction_search_uses_its_own_query() {
        let (mut app, _clock) = seeded_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "michael");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.transaction_query.as_str(), "michael");
        assert!(app.property_query.is_empty());
        assert_eq!(app.visible_transactions().len(), 1);
    }

    #[test]
    fn test_slash_ignored_on_register_tab() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_selection_moves_with_jk() {
        let (mut app, _clock) = seeded_app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_property, 1);
        // stays on the last row
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_property, 1);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_property, 0);
    }

    #[test]
    fn test_transfer_through_details_dialog() {
        let (mut app, clock) = seeded_app();
        let property_id = app.visible_properties()[0].id;

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Details);
        assert_eq!(app.detail_property, Some(property_id));

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.mode, AppMode::Transferring);
        type_text(&mut app, "  Bob  ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.transactions().len(), 2);
        let tx = app.store.transactions().last().unwrap();
        assert_eq!(tx.to_owner, "Bob");
        assert_eq!(tx.from_owner, "John Smith");

        clock.advance(Duration::from_millis(4000));
        app.tick();
        assert_eq!(app.store.find_property(property_id).unwrap().owner, "Bob");
    }

    #[test]
    fn test_blank_transfer_owner_rejected() {
        let (mut app, _clock) = seeded_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('t'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Transferring);
        assert_eq!(app.store.transactions().len(), 1);
        let toast = app.notifications.back().unwrap();
        assert_eq!(toast.level, NotificationLevel::Destructive);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Details);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.detail_property.is_none());
    }

    #[test]
    fn test_registration_form_by_keyboard() {
        let (mut app, clock) = seeded_app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Registering);

        type_text(&mut app, "1 Elm St");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Alice");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focused, FormField::PropertyType);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.property_type, Some(PropertyType::Residential));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form.property_type, Some(PropertyType::Residential));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1000");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "100000");
        press(&mut app, KeyCode::Enter);

        assert!(app.is_submitting());
        assert_eq!(app.store.properties().len(), 2);

        clock.advance(Duration::from_millis(1000));
        app.tick();
        assert_eq!(app.store.properties().len(), 3);
        let property = app.store.properties().last().unwrap();
        assert_eq!(property.address, "1 Elm St");
        assert_eq!(property.status, PropertyStatus::Pending);
        assert!(app.form.address.is_empty());

        clock.advance(Duration::from_millis(3000));
        app.tick();
        assert_eq!(app.store.properties().last().unwrap().status, PropertyStatus::Active);
    }

    #[test]
    fn test_incomplete_registration_form_rejected() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "1 Elm St");
        press(&mut app, KeyCode::Enter);

        assert!(!app.is_submitting());
        assert_eq!(app.mode, AppMode::Registering);
        assert_eq!(app.notifications.back().unwrap().title, "Invalid Form");
    }

    #[test]
    fn test_registration_backspace_edits_focused_field() {
        let mut app = App::default();
        app.start_registration();
        type_text(&mut app, "Elmx");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.address.as_str(), "Elm");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.form.address.as_str(), "Elm");
    }

    #[test]
    fn test_export_key_binding() {
        let mut app = App::default();

        // Only on the Transactions tab
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::Normal);

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.filename_input.as_str(), "transactions.csv");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_export_writes_filtered_ledger() {
        let (mut app, _clock) = seeded_app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('e'));
        app.filename_input.set(path.to_string_lossy().to_string());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported 1 transactions"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Michael Brown"));
    }

    #[test]
    fn test_export_failure_raises_toast() {
        let (mut app, _clock) = seeded_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('e'));
        app.filename_input.set("/definitely/not/here/ledger.csv");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.notifications.back().unwrap().title, "Export Failed");
    }

    #[test]
    fn test_help_scrolling() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 6);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 0);

        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
