//! Controllers binding keyboard input and state notifications to view models.
//!
//! Each controller subscribes to its state exactly once, at construction. The
//! subscription recomputes the view model synchronously and marks the pane
//! dirty. Key handling translates keys into state setters; the state then
//! notifies, which rebuilds the view. Controllers keep purely local input state
//! (modes, cursors, unsaved form text) that never goes through the state.
//!
//! A controller must not hold a borrow of its view across a call into the
//! state, since the state's notification re-enters the view cell.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::app::actions::Action;
use crate::app::admin::AdminState;
use crate::app::form::{CafeField, CafeForm, LoginForm};
use crate::app::handler::Key;
use crate::app::listing::ListingState;
use crate::app::modes::{AdminMode, ListingMode};
use crate::ui::viewmodel::{AdminView, ListingView};

/// Drives the public listing.
#[derive(Debug)]
pub struct ListingController {
    view: Rc<RefCell<ListingView>>,
    dirty: Rc<Cell<bool>>,
    mode: ListingMode,
    city_input: String,
    city_before_edit: String,
    picker_cursor: usize,
    selected: usize,
}

impl ListingController {
    /// Computes the initial view and subscribes to `state`.
    pub fn attach(state: &mut ListingState) -> Self {
        let view = Rc::new(RefCell::new(ListingView::compute(state, "")));
        let dirty = Rc::new(Cell::new(true));

        let sub_view = Rc::clone(&view);
        let sub_dirty = Rc::clone(&dirty);
        state.subscribe(move |s| {
            let previous = sub_view.borrow().results_label.clone();
            let next = ListingView::compute(s, &previous);
            *sub_view.borrow_mut() = next;
            sub_dirty.set(true);
        });

        Self {
            view,
            dirty,
            mode: ListingMode::default(),
            city_input: String::new(),
            city_before_edit: String::new(),
            picker_cursor: 0,
            selected: 0,
        }
    }

    /// Returns and clears the "view changed since last render" flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    #[must_use]
    pub fn view(&self) -> Ref<'_, ListingView> {
        self.view.borrow()
    }

    #[must_use]
    pub const fn mode(&self) -> ListingMode {
        self.mode
    }

    #[must_use]
    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    #[must_use]
    pub const fn picker_cursor(&self) -> usize {
        self.picker_cursor
    }

    /// Selected card index, clamped to the current card count.
    #[must_use]
    pub fn selected(&self) -> usize {
        let count = self.view.borrow().card_count();
        self.selected.min(count.saturating_sub(1))
    }

    /// Handles one key. Returns whether local input state changed, plus actions.
    pub fn handle_key(&mut self, state: &mut ListingState, key: &Key) -> (bool, Vec<Action>) {
        tracing::debug!(mode = ?self.mode, key = ?key, "listing key");
        match self.mode {
            ListingMode::Browse => self.handle_browse(state, *key),
            ListingMode::CityInput => (self.handle_city_input(state, *key), vec![]),
            ListingMode::Picker => (self.handle_picker(state, *key), vec![]),
        }
    }

    fn handle_browse(&mut self, state: &mut ListingState, key: Key) -> (bool, Vec<Action>) {
        match key {
            Key::Char('/') => {
                self.city_before_edit = state.city_query().to_string();
                self.city_input.clone_from(&self.city_before_edit);
                self.mode = ListingMode::CityInput;
                (true, vec![])
            }
            Key::Char('b') => {
                self.cycle_best_for(state, true);
                (false, vec![])
            }
            Key::Char('B') => {
                self.cycle_best_for(state, false);
                (false, vec![])
            }
            Key::Tab => {
                if self.view.borrow().also_good_for_options.is_empty() {
                    return (false, vec![]);
                }
                self.mode = ListingMode::Picker;
                (true, vec![])
            }
            Key::Char(c @ '1'..='9') => {
                let index = c.to_digit(10).map_or(0, |d| d as usize);
                let remaining = {
                    let view = self.view.borrow();
                    if !view.chips.iter().any(|chip| chip.index == index) {
                        return (false, vec![]);
                    }
                    view.chips
                        .iter()
                        .filter(|chip| chip.index != index)
                        .map(|chip| chip.label.clone())
                        .collect::<Vec<_>>()
                };
                state.set_also_good_for(remaining);
                (false, vec![])
            }
            Key::Char('r') => {
                self.city_input.clear();
                self.selected = 0;
                state.reset_filters();
                (true, vec![])
            }
            Key::Char('R') => {
                self.selected = 0;
                (true, state.init())
            }
            Key::Char('j') | Key::Down => {
                let before = self.selected();
                self.selected = (before + 1).min(self.view.borrow().card_count().saturating_sub(1));
                (self.selected != before, vec![])
            }
            Key::Char('k') | Key::Up => {
                let before = self.selected();
                self.selected = before.saturating_sub(1);
                (self.selected != before, vec![])
            }
            Key::Char('q') | Key::Esc => (false, vec![Action::CloseFocus]),
            _ => (false, vec![]),
        }
    }

    fn handle_city_input(&mut self, state: &mut ListingState, key: Key) -> bool {
        match key {
            Key::Char(c) => {
                self.city_input.push(c);
                self.selected = 0;
                state.set_city_query(self.city_input.clone());
            }
            Key::Backspace => {
                if self.city_input.pop().is_none() {
                    return false;
                }
                self.selected = 0;
                state.set_city_query(self.city_input.clone());
            }
            Key::Enter => self.mode = ListingMode::Browse,
            Key::Esc => {
                self.mode = ListingMode::Browse;
                self.city_input.clone_from(&self.city_before_edit);
                if state.city_query() != self.city_before_edit {
                    state.set_city_query(self.city_before_edit.clone());
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_picker(&mut self, state: &mut ListingState, key: Key) -> bool {
        let option_count = self.view.borrow().also_good_for_options.len();
        match key {
            Key::Char('j') | Key::Down => {
                self.picker_cursor = (self.picker_cursor + 1).min(option_count.saturating_sub(1));
            }
            Key::Char('k') | Key::Up => {
                self.picker_cursor = self.picker_cursor.saturating_sub(1);
            }
            Key::Char(' ') => {
                let Some(value) = self
                    .view
                    .borrow()
                    .also_good_for_options
                    .get(self.picker_cursor)
                    .map(|o| o.value.clone())
                else {
                    return false;
                };
                let mut values = state.also_good_for().to_vec();
                if let Some(pos) = values.iter().position(|v| *v == value) {
                    values.remove(pos);
                } else {
                    values.push(value);
                }
                self.selected = 0;
                state.set_also_good_for(values);
            }
            Key::Enter | Key::Esc | Key::Tab => self.mode = ListingMode::Browse,
            _ => return false,
        }
        true
    }

    fn cycle_best_for(&mut self, state: &mut ListingState, forward: bool) {
        let next = {
            let view = self.view.borrow();
            let options = &view.best_for_options;
            let current = options.iter().position(|o| o.selected).unwrap_or(0);
            let next = if forward {
                (current + 1) % options.len()
            } else {
                (current + options.len() - 1) % options.len()
            };
            options[next].value.clone()
        };
        self.selected = 0;
        state.set_best_for(next);
    }
}

/// Drives the admin console.
#[derive(Debug)]
pub struct AdminController {
    view: Rc<RefCell<AdminView>>,
    dirty: Rc<Cell<bool>>,
    mode: AdminMode,
    login: LoginForm,
    form: CafeForm,
    field: CafeField,
    also_cursor: usize,
    selected: usize,
    seen_adds: u64,
    /// Set once the open add form has been sent.
    add_submitted: bool,
}

impl AdminController {
    pub fn attach(state: &mut AdminState) -> Self {
        let view = Rc::new(RefCell::new(AdminView::compute(state)));
        let dirty = Rc::new(Cell::new(true));

        let sub_view = Rc::clone(&view);
        let sub_dirty = Rc::clone(&dirty);
        state.subscribe(move |s| {
            *sub_view.borrow_mut() = AdminView::compute(s);
            sub_dirty.set(true);
        });

        Self {
            view,
            dirty,
            mode: AdminMode::default(),
            login: LoginForm::default(),
            form: CafeForm::default(),
            field: CafeField::Title,
            also_cursor: 0,
            selected: 0,
            seen_adds: state.completed_adds(),
            add_submitted: false,
        }
    }

    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    #[must_use]
    pub fn view(&self) -> Ref<'_, AdminView> {
        self.view.borrow()
    }

    #[must_use]
    pub const fn mode(&self) -> AdminMode {
        self.mode
    }

    #[must_use]
    pub const fn login_form(&self) -> &LoginForm {
        &self.login
    }

    #[must_use]
    pub const fn form(&self) -> &CafeForm {
        &self.form
    }

    #[must_use]
    pub const fn field(&self) -> CafeField {
        self.field
    }

    #[must_use]
    pub const fn also_cursor(&self) -> usize {
        self.also_cursor
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, state: &mut AdminState, key: &Key) -> (bool, Vec<Action>) {
        tracing::debug!(mode = ?self.mode, logged_in = state.is_logged_in(), "admin key");

        if !state.is_logged_in() {
            return self.handle_login(state, *key);
        }
        if state.pending_delete().is_some() {
            let confirmed = *key == Key::Char('y');
            return (true, state.confirm_delete(confirmed));
        }
        match self.mode {
            AdminMode::Browse => self.handle_browse(state, *key),
            AdminMode::Adding | AdminMode::Editing => self.handle_form(state, *key),
        }
    }

    /// Aligns local input state with the state after an event: closes forms
    /// whose own write completed, forgets login input once logged in, and keeps the
    /// selection inside the table. Returns whether anything changed.
    pub fn reconcile(&mut self, state: &AdminState) -> bool {
        let mut changed = false;

        if state.is_logged_in() {
            if self.login != LoginForm::default() {
                self.login = LoginForm::default();
                changed = true;
            }
        } else if self.mode != AdminMode::Browse {
            self.mode = AdminMode::Browse;
            changed = true;
        }

        let adds = state.completed_adds();
        let add_completed = adds > self.seen_adds;
        self.seen_adds = adds;

        let close = match self.mode {
            AdminMode::Editing => state.current_edit().is_none(),
            AdminMode::Adding => add_completed && self.add_submitted,
            AdminMode::Browse => false,
        };
        if close {
            tracing::debug!(mode = ?self.mode, "closing form");
            self.mode = AdminMode::Browse;
            self.add_submitted = false;
            changed = true;
        }

        let max = state.cafes().len().saturating_sub(1);
        if self.selected > max {
            self.selected = max;
            changed = true;
        }
        changed
    }

    fn handle_login(&mut self, state: &mut AdminState, key: Key) -> (bool, Vec<Action>) {
        match key {
            Key::Tab | Key::BackTab | Key::Up | Key::Down => self.login.toggle_focus(),
            Key::Char(c) => self.login.focused_mut().push(c),
            Key::Backspace => {
                self.login.focused_mut().pop();
            }
            Key::Enter => {
                let (username, password) = (self.login.username.clone(), self.login.password.clone());
                return (false, state.login(&username, &password));
            }
            Key::Esc => return (false, vec![Action::CloseFocus]),
            _ => return (false, vec![]),
        }
        (true, vec![])
    }

    fn selected_id(&self) -> Option<i64> {
        self.view.borrow().rows.get(self.selected).map(|row| row.id)
    }

    fn handle_browse(&mut self, state: &mut AdminState, key: Key) -> (bool, Vec<Action>) {
        match key {
            Key::Char('j') | Key::Down => {
                let max = self.view.borrow().rows.len().saturating_sub(1);
                let before = self.selected;
                self.selected = (self.selected + 1).min(max);
                (self.selected != before, vec![])
            }
            Key::Char('k') | Key::Up => {
                let before = self.selected;
                self.selected = self.selected.saturating_sub(1);
                (self.selected != before, vec![])
            }
            Key::Char('a') => {
                self.open_form(AdminMode::Adding, CafeForm::default());
                (true, vec![])
            }
            Key::Char('e') => {
                let Some(id) = self.selected_id() else {
                    return (false, vec![]);
                };
                if !state.edit_cafe(id) {
                    return (false, vec![]);
                }
                let form = state.current_edit().map(CafeForm::from_cafe).unwrap_or_default();
                self.open_form(AdminMode::Editing, form);
                (true, vec![])
            }
            Key::Char('d') => match self.selected_id() {
                Some(id) => (false, state.delete_cafe(id)),
                None => (false, vec![]),
            },
            Key::Char('L') => {
                self.selected = 0;
                (true, state.logout())
            }
            Key::Char('R') => (false, state.init()),
            Key::Char('q') | Key::Esc => (false, vec![Action::CloseFocus]),
            _ => (false, vec![]),
        }
    }

    fn open_form(&mut self, mode: AdminMode, form: CafeForm) {
        self.mode = mode;
        self.form = form;
        self.field = CafeField::Title;
        self.also_cursor = 0;
        self.add_submitted = false;
    }

    fn handle_form(&mut self, state: &mut AdminState, key: Key) -> (bool, Vec<Action>) {
        match key {
            Key::Tab | Key::Down => self.field = self.field.next(),
            Key::BackTab | Key::Up => self.field = self.field.previous(),
            Key::Char(c) if self.field.is_text() => {
                if let Some(text) = self.form.text_mut(self.field) {
                    text.push(c);
                }
            }
            Key::Char(' ') if self.field == CafeField::AlsoGoodFor => {
                let Some(name) = state.categories().get(self.also_cursor).map(|c| c.name.clone())
                else {
                    return (false, vec![]);
                };
                self.form.toggle_also_good_for(&name);
            }
            Key::Backspace => {
                if let Some(text) = self.form.text_mut(self.field) {
                    text.pop();
                }
            }
            Key::Left | Key::Right => {
                let forward = key == Key::Right;
                match self.field {
                    CafeField::BestFor => self.form.cycle_best_for(state.categories(), forward),
                    CafeField::AlsoGoodFor => {
                        let max = state.categories().len().saturating_sub(1);
                        self.also_cursor = if forward {
                            (self.also_cursor + 1).min(max)
                        } else {
                            self.also_cursor.saturating_sub(1)
                        };
                    }
                    _ => return (false, vec![]),
                }
            }
            Key::Enter => {
                let actions = match self.mode {
                    AdminMode::Editing => state.update_cafe(&self.form),
                    _ => {
                        let actions = state.add_cafe(&self.form);
                        if actions.iter().any(|a| a.as_http().is_some()) {
                            self.add_submitted = true;
                        }
                        actions
                    }
                };
                return (false, actions);
            }
            Key::Esc => {
                if self.mode == AdminMode::Editing {
                    state.cancel_edit();
                }
                self.mode = AdminMode::Browse;
            }
            _ => return (false, vec![]),
        }
        (true, vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiGateway, HttpMethod, HttpResponse, Operation};
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};

    fn gateway() -> ApiGateway {
        ApiGateway::new("http://api.test").unwrap()
    }

    fn ready_listing() -> (ListingState, ListingController) {
        let mut state = ListingState::new(gateway());
        let controller = ListingController::attach(&mut state);
        state.init();
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCategories,
            200,
            r#"[{"name":"WiFi"},{"name":"Quiet"}]"#,
        ));
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCafes,
            200,
            r#"[
                {"id":1,"title":"Bean","city":"Paris","best_for":"WiFi","also_good_for":["Quiet"]},
                {"id":2,"title":"Leaf","city":"Rome","best_for":"Quiet","also_good_for":["WiFi"]}
            ]"#,
        ));
        (state, controller)
    }

    fn type_text(controller: &mut ListingController, state: &mut ListingState, text: &str) {
        for c in text.chars() {
            controller.handle_key(state, &Key::Char(c));
        }
    }

    #[test]
    fn test_notification_rebuilds_view() {
        let (mut state, controller) = ready_listing();
        assert!(controller.take_dirty());
        assert!(!controller.take_dirty());

        state.set_best_for("WiFi");
        assert!(controller.take_dirty());
        assert_eq!(controller.view().results_label, "Found 2 cafes");
        let ids: Vec<i64> = state.filtered_cafes().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_city_input_applies_live_and_escape_restores() {
        let (mut state, mut controller) = ready_listing();

        controller.handle_key(&mut state, &Key::Char('/'));
        assert_eq!(controller.mode(), ListingMode::CityInput);
        type_text(&mut controller, &mut state, "rom");
        assert_eq!(state.city_query(), "rom");
        assert!(controller.view().sidebar_visible);

        controller.handle_key(&mut state, &Key::Esc);
        assert_eq!(state.city_query(), "");
        assert_eq!(controller.mode(), ListingMode::Browse);

        controller.handle_key(&mut state, &Key::Char('/'));
        type_text(&mut controller, &mut state, "paris");
        controller.handle_key(&mut state, &Key::Enter);
        assert_eq!(state.city_query(), "paris");
        assert_eq!(controller.view().results_label, "Found 1 cafes");
    }

    #[test]
    fn test_best_for_cycles_through_all_categories() {
        let (mut state, mut controller) = ready_listing();

        controller.handle_key(&mut state, &Key::Char('b'));
        assert_eq!(state.best_for(), "WiFi");
        controller.handle_key(&mut state, &Key::Char('b'));
        assert_eq!(state.best_for(), "Quiet");
        controller.handle_key(&mut state, &Key::Char('b'));
        assert_eq!(state.best_for(), "");
        controller.handle_key(&mut state, &Key::Char('B'));
        assert_eq!(state.best_for(), "Quiet");
    }

    #[test]
    fn test_picker_toggles_and_chip_digit_removes() {
        let (mut state, mut controller) = ready_listing();

        controller.handle_key(&mut state, &Key::Tab);
        assert_eq!(controller.mode(), ListingMode::Picker);
        controller.handle_key(&mut state, &Key::Char(' '));
        controller.handle_key(&mut state, &Key::Char('j'));
        controller.handle_key(&mut state, &Key::Char(' '));
        controller.handle_key(&mut state, &Key::Enter);
        assert_eq!(state.also_good_for(), ["WiFi".to_string(), "Quiet".to_string()]);
        assert_eq!(controller.view().chips.len(), 2);

        controller.handle_key(&mut state, &Key::Char('1'));
        assert_eq!(state.also_good_for(), ["Quiet".to_string()]);
        let (_, actions) = controller.handle_key(&mut state, &Key::Char('5'));
        assert!(actions.is_empty());
        assert_eq!(state.also_good_for().len(), 1);
    }

    #[test]
    fn test_reset_and_reload() {
        let (mut state, mut controller) = ready_listing();
        controller.handle_key(&mut state, &Key::Char('/'));
        type_text(&mut controller, &mut state, "x");
        controller.handle_key(&mut state, &Key::Enter);

        controller.handle_key(&mut state, &Key::Char('r'));
        assert_eq!(state.city_query(), "");
        assert_eq!(controller.city_input(), "");

        let (_, actions) = controller.handle_key(&mut state, &Key::Char('R'));
        assert_eq!(actions.len(), 1);
        assert!(controller.view().loading_visible);

        let (_, actions) = controller.handle_key(&mut state, &Key::Char('q'));
        assert_eq!(actions, vec![Action::CloseFocus]);
    }

    fn logged_in_admin() -> (AdminState, AdminController) {
        let mut store = MemoryKeyValueStore::default();
        store.set("token", "t").unwrap();
        let mut state = AdminState::new(gateway(), Box::new(store), 5.0);
        let controller = AdminController::attach(&mut state);
        state.init();
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCategories,
            200,
            r#"[{"name":"WiFi"},{"name":"Quiet"}]"#,
        ));
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCafes,
            200,
            r#"[{"id":7,"title":"Old","city":"Paris","description":"d","best_for":"WiFi","also_good_for":[]}]"#,
        ));
        (state, controller)
    }

    #[test]
    fn test_login_form_collects_input() {
        let mut state = AdminState::new(gateway(), Box::new(MemoryKeyValueStore::default()), 5.0);
        let mut controller = AdminController::attach(&mut state);

        for c in "ann".chars() {
            controller.handle_key(&mut state, &Key::Char(c));
        }
        controller.handle_key(&mut state, &Key::Tab);
        controller.handle_key(&mut state, &Key::Char('p'));
        assert_eq!(controller.login_form().masked_password(), "*");

        let (_, actions) = controller.handle_key(&mut state, &Key::Enter);
        let request = actions[0].as_http().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body_text(), "username=ann&password=p");
    }

    #[test]
    fn test_edit_prefills_and_update_closes_form() {
        let (mut state, mut controller) = logged_in_admin();

        controller.handle_key(&mut state, &Key::Char('e'));
        assert_eq!(controller.mode(), AdminMode::Editing);
        assert_eq!(controller.form().title, "Old");
        assert_eq!(controller.view().editing.as_deref(), Some("Old"));

        let (_, actions) = controller.handle_key(&mut state, &Key::Enter);
        let request = actions[0].as_http().unwrap();
        assert_eq!(request.method, HttpMethod::Put);

        state.on_response(&HttpResponse::for_operation(Operation::UpdateCafe, 200, "{}"));
        assert!(controller.reconcile(&state));
        assert_eq!(controller.mode(), AdminMode::Browse);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut state, mut controller) = logged_in_admin();

        let (_, actions) = controller.handle_key(&mut state, &Key::Char('d'));
        assert!(actions.is_empty());
        assert!(controller.view().confirm_delete.is_some());

        let (_, actions) = controller.handle_key(&mut state, &Key::Char('n'));
        assert!(actions.is_empty());
        assert!(controller.view().confirm_delete.is_none());
        assert_eq!(state.cafes().len(), 1);

        controller.handle_key(&mut state, &Key::Char('d'));
        let (_, actions) = controller.handle_key(&mut state, &Key::Char('y'));
        assert_eq!(actions[0].as_http().unwrap().method, HttpMethod::Delete);
    }

    #[test]
    fn test_add_form_survives_unrelated_write() {
        let (mut state, mut controller) = logged_in_admin();

        controller.handle_key(&mut state, &Key::Char('d'));
        controller.handle_key(&mut state, &Key::Char('y'));
        controller.handle_key(&mut state, &Key::Char('a'));
        for c in "Half typed".chars() {
            controller.handle_key(&mut state, &Key::Char(c));
        }

        state.on_response(&HttpResponse::for_operation(Operation::DeleteCafe, 204, Vec::new()));
        controller.reconcile(&state);
        assert_eq!(state.completed_writes(), 1);
        assert_eq!(controller.mode(), AdminMode::Adding);
        assert_eq!(controller.form().title, "Half typed");

        for key in [Key::Tab, Key::Char('R'), Key::Tab, Key::Char('d'), Key::Tab, Key::Tab, Key::Right] {
            controller.handle_key(&mut state, &key);
        }
        let (_, actions) = controller.handle_key(&mut state, &Key::Enter);
        assert_eq!(actions[0].as_http().unwrap().method, HttpMethod::Post);

        state.on_response(&HttpResponse::for_operation(Operation::AddCafe, 201, "{}"));
        assert!(controller.reconcile(&state));
        assert_eq!(controller.mode(), AdminMode::Browse);
    }

    #[test]
    fn test_form_esc_cancels_edit() {
        let (mut state, mut controller) = logged_in_admin();
        controller.handle_key(&mut state, &Key::Char('e'));
        controller.handle_key(&mut state, &Key::Esc);

        assert_eq!(controller.mode(), AdminMode::Browse);
        assert!(state.current_edit().is_none());
    }

    #[test]
    fn test_logout_returns_to_login() {
        let (mut state, mut controller) = logged_in_admin();
        controller.handle_key(&mut state, &Key::Char('L'));

        assert!(!state.is_logged_in());
        assert!(!controller.view().logged_in);
        assert_eq!(controller.view().count_label, "Cafes (0)");
    }
}
