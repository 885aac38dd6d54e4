//! Application state for the land registry terminal UI.
//!
//! [`App`] owns the [`RegistryStore`] and everything the views need on top
//! of it: the active tab, search queries, the registration form, the
//! property details dialog and the toast stack.

use super::form::RegistrationForm;
use super::notifications::{Notification, NotificationLevel};
use super::text_input::TextInput;
use crate::domain::{
    filter_properties, filter_transactions, LedgerSummary, Property, PropertyId,
    RegistrationInput, RegistryAnalytics, RegistryStore, Transaction,
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const MAX_NOTIFICATIONS: usize = 5;
const DEFAULT_EXPORT_FILENAME: &str = "transactions.csv";

/// The four panels of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Register,
    Transactions,
    Analytics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Search, Tab::Register, Tab::Transactions, Tab::Analytics];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Search => "Search Properties",
            Tab::Register => "Register Property",
            Tab::Transactions => "Transactions",
            Tab::Analytics => "Analytics",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

/// Determines how key presses are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Tab switching and list navigation
    Normal,
    /// Typing into the active tab's search box
    Searching,
    /// Editing the registration form
    Registering,
    /// Property details dialog is open
    Details,
    /// Typing the new owner inside the details dialog
    Transferring,
    /// Ledger export filename prompt
    ExportCsv,
    /// Help screen is displayed
    Help,
}

/// UI-side delays, separate from the registry's own confirmation delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTimings {
    /// Simulated network latency between submitting the form and the
    /// registry receiving it.
    pub submission_delay: Duration,
    /// How long a toast stays on screen.
    pub toast_duration: Duration,
}

impl Default for UiTimings {
    fn default() -> Self {
        Self {
            submission_delay: Duration::from_millis(1000),
            toast_duration: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingSubmission {
    due: Instant,
    input: RegistrationInput,
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use land_registry::application::{App, AppMode, Tab};
///
/// let app = App::default();
/// assert_eq!(app.active_tab, Tab::Search);
/// assert_eq!(app.mode, AppMode::Normal);
/// ```
#[derive(Debug)]
pub struct App {
    pub store: RegistryStore,
    pub timings: UiTimings,
    pub active_tab: Tab,
    pub mode: AppMode,
    pub property_query: TextInput,
    pub transaction_query: TextInput,
    /// Row highlighted in the filtered property list
    pub selected_property: usize,
    /// Row highlighted in the filtered transaction list
    pub selected_transaction: usize,
    /// Property shown in the details dialog
    pub detail_property: Option<PropertyId>,
    pub transfer_owner: TextInput,
    pub form: RegistrationForm,
    pending_submission: Option<PendingSubmission>,
    pub filename_input: TextInput,
    /// Newest last
    pub notifications: VecDeque<Notification>,
    pub help_scroll: usize,
    pub status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(RegistryStore::default(), UiTimings::default())
    }
}

impl App {
    pub fn new(store: RegistryStore, timings: UiTimings) -> Self {
        Self {
            store,
            timings,
            active_tab: Tab::Search,
            mode: AppMode::Normal,
            property_query: TextInput::default(),
            transaction_query: TextInput::default(),
            selected_property: 0,
            selected_transaction: 0,
            detail_property: None,
            transfer_owner: TextInput::default(),
            form: RegistrationForm::default(),
            pending_submission: None,
            filename_input: TextInput::default(),
            notifications: VecDeque::new(),
            help_scroll: 0,
            status_message: None,
        }
    }

    /// Advances everything that waits on time.
    ///
    /// Fires due registry confirmations, hands a due form submission to the
    /// registry, converts registry events into toasts and drops expired ones.
    pub fn tick(&mut self) {
        self.store.tick();

        let now = self.store.now();
        if self.pending_submission.as_ref().is_some_and(|p| p.due <= now) {
            if let Some(submission) = self.pending_submission.take() {
                self.store.register_property(submission.input);
                self.form.reset();
                self.status_message = None;
            }
        }

        self.collect_registry_events();

        let ttl = self.timings.toast_duration;
        self.notifications.retain(|n| !n.is_expired(now, ttl));
        self.clamp_selection();
    }

    fn collect_registry_events(&mut self) {
        let now = self.store.now();
        for event in self.store.drain_events() {
            self.notify(Notification::from_event(&event, now));
        }
    }

    /// Pushes a toast, dropping the oldest when the stack is full.
    pub fn notify(&mut self, notification: Notification) {
        debug!(title = %notification.title, "notification raised");
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    fn notify_destructive(&mut self, title: &str, description: String) {
        let now = self.store.now();
        self.notify(Notification::new(NotificationLevel::Destructive, title, description, now));
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.status_message = None;
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.active_tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.active_tab.previous());
    }

    pub fn visible_properties(&self) -> Vec<&Property> {
        filter_properties(self.store.properties(), self.property_query.as_str())
    }

    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        filter_transactions(self.store.transactions(), self.transaction_query.as_str())
    }

    pub fn ledger_summary(&self) -> LedgerSummary {
        LedgerSummary::from_transactions(&self.visible_transactions())
    }

    pub fn analytics(&self) -> RegistryAnalytics {
        RegistryAnalytics::compute(self.store.properties(), self.store.transactions())
    }

    pub fn selected_visible_property(&self) -> Option<&Property> {
        self.visible_properties().get(self.selected_property).copied()
    }

    pub fn detail_property(&self) -> Option<&Property> {
        self.detail_property.and_then(|id| self.store.find_property(id))
    }

    /// Keeps list selections inside the filtered lists.
    pub fn clamp_selection(&mut self) {
        let properties = self.visible_properties().len();
        let transactions = self.visible_transactions().len();
        self.selected_property = self.selected_property.min(properties.saturating_sub(1));
        self.selected_transaction = self.selected_transaction.min(transactions.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        match self.active_tab {
            Tab::Search => {
                if self.selected_property + 1 < self.visible_properties().len() {
                    self.selected_property += 1;
                }
            }
            Tab::Transactions => {
                if self.selected_transaction + 1 < self.visible_transactions().len() {
                    self.selected_transaction += 1;
                }
            }
            Tab::Register | Tab::Analytics => {}
        }
    }

    pub fn select_previous(&mut self) {
        match self.active_tab {
            Tab::Search => self.selected_property = self.selected_property.saturating_sub(1),
            Tab::Transactions => {
                self.selected_transaction = self.selected_transaction.saturating_sub(1)
            }
            Tab::Register | Tab::Analytics => {}
        }
    }

    /// Starts editing the search box of the active tab, if it has one.
    pub fn start_search(&mut self) {
        if matches!(self.active_tab, Tab::Search | Tab::Transactions) {
            self.mode = AppMode::Searching;
            self.status_message = None;
        }
    }

    /// The search box belonging to the active tab.
    pub fn search_input_mut(&mut self) -> &mut TextInput {
        match self.active_tab {
            Tab::Transactions => &mut self.transaction_query,
            _ => &mut self.property_query,
        }
    }

    /// Leaves search mode keeping the query and reports the match count.
    pub fn finish_search(&mut self) {
        self.mode = AppMode::Normal;
        let (count, query) = match self.active_tab {
            Tab::Transactions => (self.visible_transactions().len(), self.transaction_query.value.clone()),
            _ => (self.visible_properties().len(), self.property_query.value.clone()),
        };
        if !query.is_empty() {
            self.status_message = Some(format!(
                "{} result{} for '{}'",
                count,
                if count == 1 { "" } else { "s" },
                query
            ));
        }
    }

    /// Leaves search mode and clears the query.
    pub fn cancel_search(&mut self) {
        self.mode = AppMode::Normal;
        self.search_input_mut().clear();
        self.clamp_selection();
    }

    /// Opens the details dialog for the highlighted property.
    pub fn open_details(&mut self) {
        if let Some(id) = self.selected_visible_property().map(|p| p.id) {
            self.detail_property = Some(id);
            self.mode = AppMode::Details;
        }
    }

    pub fn close_details(&mut self) {
        self.detail_property = None;
        self.transfer_owner.clear();
        self.mode = AppMode::Normal;
    }

    pub fn start_transfer(&mut self) {
        if self.detail_property.is_some() {
            self.transfer_owner.clear();
            self.mode = AppMode::Transferring;
        }
    }

    pub fn cancel_transfer(&mut self) {
        self.transfer_owner.clear();
        self.mode = AppMode::Details;
    }

    /// Sends the transfer typed in the details dialog to the registry.
    ///
    /// A blank owner keeps the dialog open with an error toast.
    pub fn submit_transfer(&mut self) {
        let new_owner = self.transfer_owner.value.trim().to_string();
        if new_owner.is_empty() {
            self.notify_destructive("Invalid Owner", "Enter the name of the new owner.".to_string());
            return;
        }
        if let Some(property_id) = self.detail_property {
            self.store.transfer_property(property_id, &new_owner);
            self.collect_registry_events();
        }
        self.close_details();
    }

    pub fn start_registration(&mut self) {
        self.select_tab(Tab::Register);
        self.mode = AppMode::Registering;
    }

    /// Leaves the form; typed values are kept.
    pub fn cancel_registration(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn is_submitting(&self) -> bool {
        self.pending_submission.is_some()
    }

    /// Validates the form and, if it passes, queues it for the registry.
    pub fn submit_registration(&mut self) {
        if self.is_submitting() {
            self.notify_destructive(
                "Submission In Progress",
                "A registration is already being submitted.".to_string(),
            );
            return;
        }

        match self.form.validate() {
            Ok(input) => {
                info!(address = %input.address, "registration form submitted");
                let due = self.store.now() + self.timings.submission_delay;
                self.pending_submission = Some(PendingSubmission { due, input });
                self.mode = AppMode::Normal;
                self.status_message = Some("Submitting registration...".to_string());
            }
            Err(err) => {
                debug!(error = %err, "registration form rejected");
                self.notify_destructive(
                    "Invalid Form",
                    format!("Please fill in all required fields with valid values ({err})."),
                );
            }
        }
    }

    pub fn start_export(&mut self) {
        if self.active_tab == Tab::Transactions {
            self.mode = AppMode::ExportCsv;
            self.filename_input.set(DEFAULT_EXPORT_FILENAME);
            self.status_message = None;
        }
    }

    /// Returns the filename input if not empty, otherwise the default.
    pub fn get_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            DEFAULT_EXPORT_FILENAME.to_string()
        } else {
            self.filename_input.value.clone()
        }
    }

    pub fn cancel_export(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Reports the outcome of a ledger export and returns to normal mode.
    pub fn set_export_result(&mut self, filename: &str, result: Result<usize, String>) {
        match result {
            Ok(rows) => {
                self.status_message = Some(format!("Exported {rows} transactions to {filename}"));
            }
            Err(error) => {
                self.notify_destructive("Export Failed", error);
            }
        }
        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::form::FormField;
    use crate::domain::{
        ConfirmationDelays, ManualClock, PropertyStatus, PropertyType, TransactionStatus,
    };

    fn app_with_clock() -> (App, ManualClock) {
        let clock = ManualClock::new();
        let store = RegistryStore::with_clock(ConfirmationDelays::default(), Box::new(clock.clone()));
        (App::new(store, UiTimings::default()), clock)
    }

    fn fill_form(app: &mut App) {
        app.form.address.set("1 Elm St");
        app.form.owner.set("Alice");
        app.form.property_type = Some(PropertyType::Residential);
        app.form.area.set("1000");
        app.form.value.set("100000");
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.active_tab, Tab::Search);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.property_query.is_empty());
        assert!(app.notifications.is_empty());
        assert!(app.detail_property.is_none());
        assert!(!app.is_submitting());
        assert!(app.store.properties().is_empty());
    }

    #[test]
    fn test_tab_cycling() {
        let mut app = App::default();
        app.next_tab();
        assert_eq!(app.active_tab, Tab::Register);
        app.previous_tab();
        app.previous_tab();
        assert_eq!(app.active_tab, Tab::Analytics);
        assert_eq!(Tab::from_index(2), Some(Tab::Transactions));
        assert_eq!(Tab::from_index(4), None);
    }

    #[test]
    fn test_invalid_form_raises_destructive_toast() {
        let (mut app, _clock) = app_with_clock();
        app.start_registration();
        app.submit_registration();

        assert!(!app.is_submitting());
        assert!(app.store.properties().is_empty());
        let toast = app.notifications.back().unwrap();
        assert_eq!(toast.level, NotificationLevel::Destructive);
        assert_eq!(toast.title, "Invalid Form");
        assert_eq!(app.mode, AppMode::Registering);
    }

    #[test]
    fn test_second_submit_while_submitting_raises_toast() {
        let (mut app, clock) = app_with_clock();
        app.start_registration();
        fill_form(&mut app);
        app.submit_registration();

        app.start_registration();
        app.submit_registration();
        let toast = app.notifications.back().unwrap();
        assert_eq!(toast.title, "Submission In Progress");
        assert_eq!(toast.level, NotificationLevel::Destructive);
        assert_eq!(app.mode, AppMode::Registering);

        clock.advance(Duration::from_millis(1000));
        app.tick();
        assert_eq!(app.store.properties().len(), 1);
    }

    #[test]
    fn test_huge_value_is_stored_exactly() {
        let (mut app, clock) = app_with_clock();
        app.start_registration();
        fill_form(&mut app);
        app.form.value.set("1e20");
        app.submit_registration();

        clock.advance(Duration::from_millis(1000));
        app.tick();
        assert_eq!(app.store.properties()[0].value, 1e20);
    }

    #[test]
    fn test_registration_goes_through_submission_delay() {
        let (mut app, clock) = app_with_clock();
        app.start_registration();
        fill_form(&mut app);
        app.submit_registration();

        assert!(app.is_submitting());
        assert_eq!(app.mode, AppMode::Normal);
        app.tick();
        assert!(app.store.properties().is_empty());

        clock.advance(Duration::from_millis(1000));
        app.tick();
        assert!(!app.is_submitting());
        assert_eq!(app.store.properties().len(), 1);
        assert_eq!(app.store.properties()[0].status, PropertyStatus::Pending);
        assert_eq!(app.form, RegistrationForm::default());
        assert_eq!(app.notifications.back().unwrap().title, "Registration Submitted");

        clock.advance(Duration::from_millis(3000));
        app.tick();
        assert_eq!(app.store.properties()[0].status, PropertyStatus::Active);
        assert_eq!(app.notifications.back().unwrap().title, "Property Registered");
    }

    #[test]
    fn test_transfer_from_details_dialog() {
        let (mut app, clock) = app_with_clock();
        app.store.seed_demo_data();
        app.open_details();
        assert_eq!(app.mode, AppMode::Details);
        let property_id = app.detail_property.unwrap();

        app.start_transfer();
        app.transfer_owner.set("  Bob  ");
        app.submit_transfer();

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.detail_property.is_none());
        let tx = app.store.transactions().last().unwrap();
        assert_eq!(tx.to_owner, "Bob");
        assert_eq!(tx.from_owner, "John Smith");
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(app.notifications.back().unwrap().title, "Transfer Initiated");

        clock.advance(Duration::from_secs(4));
        app.tick();
        assert_eq!(app.store.find_property(property_id).unwrap().owner, "Bob");
        assert_eq!(app.notifications.back().unwrap().title, "Transfer Completed");
    }

    #[test]
    fn test_blank_transfer_owner_rejected() {
        let (mut app, _clock) = app_with_clock();
        app.store.seed_demo_data();
        app.open_details();
        app.start_transfer();
        app.transfer_owner.set("   ");
        app.submit_transfer();

        assert_eq!(app.mode, AppMode::Transferring);
        assert_eq!(app.store.transactions().len(), 1);
        assert_eq!(app.notifications.back().unwrap().level, NotificationLevel::Destructive);
    }

    #[test]
    fn test_open_details_with_no_match_does_nothing() {
        let (mut app, _clock) = app_with_clock();
        app.store.seed_demo_data();
        app.property_query.set("no such parcel");
        app.open_details();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.detail_property.is_none());
    }

    #[test]
    fn test_search_filters_and_clamps_selection() {
        let (mut app, _clock) = app_with_clock();
        app.store.seed_demo_data();
        app.selected_property = 1;
        app.start_search();
        app.search_input_mut().set("maple");
        app.clamp_selection();

        assert_eq!(app.visible_properties().len(), 1);
        assert_eq!(app.selected_property, 0);
        app.finish_search();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("1 result for 'maple'"));
    }

    #[test]
    fn test_cancel_search_clears_query() {
        let (mut app, _clock) = app_with_clock();
        app.select_tab(Tab::Transactions);
        app.start_search();
        app.search_input_mut().set("brown");
        app.cancel_search();
        assert!(app.transaction_query.is_empty());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_search_not_available_on_analytics() {
        let mut app = App::default();
        app.select_tab(Tab::Analytics);
        app.start_search();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_selection_moves_within_bounds() {
        let (mut app, _clock) = app_with_clock();
        app.store.seed_demo_data();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_property, 1);
        app.select_previous();
        app.select_previous();
        assert_eq!(app.selected_property, 0);
    }

    #[test]
    fn test_toasts_expire_and_are_capped() {
        let (mut app, clock) = app_with_clock();
        for n in 0..(MAX_NOTIFICATIONS + 2) {
            app.notify(Notification::new(
                NotificationLevel::Info,
                format!("toast {n}"),
                "",
                app.store.now(),
            ));
        }
        assert_eq!(app.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(app.notifications.front().unwrap().title, "toast 2");

        clock.advance(Duration::from_secs(5));
        app.tick();
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_ledger_summary_follows_transaction_query() {
        let (mut app, _clock) = app_with_clock();
        app.store.seed_demo_data();
        assert_eq!(app.ledger_summary().completed, 1);
        assert_eq!(app.ledger_summary().completed_value, 450_000.0);

        app.transaction_query.set("nobody");
        assert_eq!(app.ledger_summary().total(), 0);
    }

    #[test]
    fn test_analytics_cover_whole_registry() {
        let (mut app, _clock) = app_with_clock();
        app.store.seed_demo_data();
        app.property_query.set("maple");
        let analytics = app.analytics();
        assert_eq!(analytics.total_properties, 2);
        assert_eq!(analytics.total_transactions, 1);
        assert_eq!(analytics.total_value, 770_000.0);
    }

    #[test]
    fn test_export_prompt() {
        let mut app = App::default();
        app.start_export();
        assert_eq!(app.mode, AppMode::Normal);

        app.select_tab(Tab::Transactions);
        app.start_export();
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.get_export_filename(), "transactions.csv");

        app.set_export_result("transactions.csv", Ok(3));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.unwrap().contains("Exported 3 transactions"));
    }

    #[test]
    fn test_export_failure_raises_toast() {
        let mut app = App::default();
        app.select_tab(Tab::Transactions);
        app.start_export();
        app.set_export_result("/nope/out.csv", Err("No such file or directory".to_string()));
        assert_eq!(app.notifications.back().unwrap().title, "Export Failed");
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_form_focus_starts_at_address() {
        let mut app = App::default();
        app.start_registration();
        assert_eq!(app.active_tab, Tab::Register);
        assert_eq!(app.form.focused, FormField::Address);
    }
}
