//! Application state for the admin console.
//!
//! Adds authentication and create/update/delete on top of the data the listing
//! shows. Writes never patch the local list: a successful write always refetches
//! `/cafes`, and a failed write leaves the list as it was.
//!
//! Update and delete address the backend row by the `(title, city)` pair the cafe
//! had when it was loaded. The pair is captured from the edit target, never from
//! the form, so renaming a cafe still updates the right row. This relies on the
//! backend keeping `(title, city)` unique.

use crate::api::{ApiGateway, ApiReply, HttpResponse, Operation};
use crate::app::actions::Action;
use crate::app::flash::{Flash, FlashBoard, FlashSlot, Tone};
use crate::app::form::CafeForm;
use crate::app::notifier::Subscribers;
use crate::domain::cafe::{Cafe, Category};
use crate::domain::error::ConsoleError;
use crate::storage::KeyValueStore;
use std::fmt;

/// Key under which the access token is persisted.
pub const TOKEN_KEY: &str = "token";

pub struct AdminState {
    gateway: ApiGateway,
    store: Box<dyn KeyValueStore>,
    token: Option<String>,
    cafes: Vec<Cafe>,
    categories: Vec<Category>,
    is_loading: bool,
    current_edit: Option<Cafe>,
    pending_delete: Option<Cafe>,
    completed_writes: u64,
    completed_adds: u64,
    flash: FlashBoard,
    subscribers: Subscribers<Self>,
}

impl AdminState {
    /// Creates the state, restoring a previously stored token.
    #[must_use]
    pub fn new(gateway: ApiGateway, store: Box<dyn KeyValueStore>, flash_seconds: f64) -> Self {
        let token = read_token(store.as_ref());
        tracing::debug!(has_token = token.is_some(), "admin state created");

        Self {
            gateway,
            store,
            token,
            cafes: Vec::new(),
            categories: Vec::new(),
            is_loading: false,
            current_edit: None,
            pending_delete: None,
            completed_writes: 0,
            completed_adds: 0,
            flash: FlashBoard::new(flash_seconds),
            subscribers: Subscribers::default(),
        }
    }

    /// Swaps in the persistent token store once the host grants file access
    /// and restores the token it holds. A token already held in memory is
    /// kept when the new store has none.
    pub fn attach_store(&mut self, mut store: Box<dyn KeyValueStore>) {
        if let Some(token) = read_token(store.as_ref()) {
            self.token = Some(token);
        } else if let Some(token) = self.token.as_deref() {
            if let Err(e) = store.set(TOKEN_KEY, token) {
                tracing::warn!(error = %e, "failed to persist token");
            }
        }
        self.store = store;
        tracing::debug!(has_token = self.token.is_some(), "token store attached");
        self.notify();
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Self) + 'static) -> usize {
        self.subscribers.subscribe(listener)
    }

    fn notify(&self) {
        self.subscribers.notify(self);
    }

    /// Loads categories then cafes when logged in; otherwise just shows the
    /// logged-out view.
    pub fn init(&mut self) -> Vec<Action> {
        let _span = tracing::debug_span!("admin_init", logged_in = self.token.is_some()).entered();

        if self.token.is_none() {
            self.notify();
            return vec![];
        }

        self.is_loading = true;
        self.notify();
        vec![Action::Http(self.gateway.load_categories())]
    }

    pub fn login(&mut self, username: &str, password: &str) -> Vec<Action> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return self.post(
                FlashSlot::Auth,
                Tone::Error,
                "Error: Username and password are required".to_string(),
            );
        }
        tracing::debug!(username = %username, "logging in");
        vec![Action::Http(self.gateway.login(username, password))]
    }

    /// Forgets the token and every piece of loaded data.
    pub fn logout(&mut self) -> Vec<Action> {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove stored token");
        }
        self.token = None;
        self.cafes.clear();
        self.categories.clear();
        self.is_loading = false;
        self.current_edit = None;
        self.pending_delete = None;
        self.flash.clear();
        tracing::debug!("logged out");
        self.notify();
        vec![]
    }

    pub fn add_cafe(&mut self, form: &CafeForm) -> Vec<Action> {
        let _span = tracing::debug_span!("admin_add_cafe").entered();

        let Some(token) = self.token.clone() else {
            return self.report(&ConsoleError::AuthRequired);
        };
        let request = form
            .validate(&self.categories)
            .and_then(|payload| self.gateway.add_cafe(&payload, &token));
        match request {
            Ok(request) => vec![Action::Http(request)],
            Err(e) => self.report(&e),
        }
    }

    /// Selects the cafe with `id` as edit target. Returns `false` if unknown.
    pub fn edit_cafe(&mut self, id: i64) -> bool {
        let Some(cafe) = self.cafes.iter().find(|c| c.id == id).cloned() else {
            return false;
        };
        tracing::debug!(id, title = %cafe.title, "editing cafe");
        self.current_edit = Some(cafe);
        self.notify();
        true
    }

    pub fn cancel_edit(&mut self) {
        if self.current_edit.take().is_some() {
            self.notify();
        }
    }

    pub fn update_cafe(&mut self, form: &CafeForm) -> Vec<Action> {
        let _span = tracing::debug_span!("admin_update_cafe").entered();

        let Some(token) = self.token.clone() else {
            return self.report(&ConsoleError::AuthRequired);
        };
        let Some(key) = self.current_edit.as_ref().map(Cafe::key) else {
            return self.report(&ConsoleError::Validation(
                "No cafe selected for editing".to_string(),
            ));
        };
        let request = form
            .validate(&self.categories)
            .and_then(|payload| self.gateway.update_cafe(&key, &payload, &token));
        match request {
            Ok(request) => vec![Action::Http(request)],
            Err(e) => self.report(&e),
        }
    }

    /// Asks for confirmation before deleting the cafe with `id`. Nothing is sent
    /// until [`AdminState::confirm_delete`] is called with `true`.
    pub fn delete_cafe(&mut self, id: i64) -> Vec<Action> {
        if self.token.is_none() {
            return self.report(&ConsoleError::AuthRequired);
        }
        if let Some(cafe) = self.cafes.iter().find(|c| c.id == id).cloned() {
            self.pending_delete = Some(cafe);
            self.notify();
        }
        vec![]
    }

    pub fn confirm_delete(&mut self, confirmed: bool) -> Vec<Action> {
        let Some(target) = self.pending_delete.take() else {
            return vec![];
        };
        tracing::debug!(title = %target.title, confirmed, "delete confirmation answered");

        if !confirmed {
            self.notify();
            return vec![];
        }
        let Some(token) = self.token.clone() else {
            return self.report(&ConsoleError::AuthRequired);
        };
        self.notify();
        vec![Action::Http(self.gateway.delete_cafe(&target.key(), &token))]
    }

    /// Handles one elapsed message timer.
    pub fn expire_flash(&mut self) {
        if self.flash.expire_oldest() {
            self.notify();
        }
    }

    pub fn on_response(&mut self, response: &HttpResponse) -> Vec<Action> {
        let Some(operation) = response.operation else {
            return vec![];
        };
        let _span = tracing::debug_span!("admin_on_response", operation = %operation, status = response.status).entered();

        if self.token.is_none() && operation != Operation::Login {
            tracing::debug!("ignoring response received after logout");
            return vec![];
        }

        match (operation, ApiGateway::decode(response)) {
            (Operation::LoadCategories, Ok(ApiReply::Categories(categories))) => {
                self.categories = categories;
                self.refetch()
            }
            (Operation::LoadCafes, Ok(ApiReply::Cafes(cafes))) => {
                tracing::debug!(count = cafes.len(), "cafes loaded");
                self.cafes = cafes;
                self.is_loading = false;
                self.notify();
                vec![]
            }
            (Operation::LoadCategories | Operation::LoadCafes, Err(e)) => {
                self.is_loading = false;
                self.post(FlashSlot::Auth, Tone::Error, format!("Error: {e}"))
            }
            (Operation::Login, Ok(ApiReply::LoggedIn { access_token })) => {
                if let Err(e) = self.store.set(TOKEN_KEY, &access_token) {
                    tracing::warn!(error = %e, "failed to persist token");
                }
                self.token = Some(access_token);
                tracing::debug!("login succeeded");
                self.init()
            }
            (Operation::Login, Err(e)) => {
                self.post(FlashSlot::Auth, Tone::Error, format!("Error: {e}"))
            }
            (Operation::AddCafe, Ok(ApiReply::CafeSaved)) => {
                self.completed_adds += 1;
                self.write_succeeded("Cafe added successfully!")
            }
            (Operation::UpdateCafe, Ok(ApiReply::CafeSaved)) => {
                self.current_edit = None;
                self.write_succeeded("Cafe updated successfully!")
            }
            (Operation::DeleteCafe, Ok(ApiReply::CafeDeleted)) => {
                self.write_succeeded("Cafe deleted successfully!")
            }
            (op, Err(e)) if op.is_write() => self.report(&e),
            (op, reply) => {
                tracing::debug!(operation = %op, reply = ?reply, "unexpected reply");
                vec![]
            }
        }
    }

    fn write_succeeded(&mut self, message: &str) -> Vec<Action> {
        self.completed_writes += 1;
        let mut actions = self.post(FlashSlot::Main, Tone::Success, message.to_string());
        actions.extend(self.refetch());
        actions
    }

    fn refetch(&self) -> Vec<Action> {
        self.token
            .as_deref()
            .map(|token| Action::Http(self.gateway.load_cafes(Some(token))))
            .into_iter()
            .collect()
    }

    /// Turns an error into a transient message on the main line.
    fn report(&mut self, err: &ConsoleError) -> Vec<Action> {
        let text = match err {
            ConsoleError::AuthRequired => err.to_string(),
            _ => format!("Error: {err}"),
        };
        self.post(FlashSlot::Main, Tone::Error, text)
    }

    fn post(&mut self, slot: FlashSlot, tone: Tone, text: String) -> Vec<Action> {
        let timer = self.flash.post(slot, tone, text);
        self.notify();
        vec![timer]
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn cafes(&self) -> &[Cafe] {
        &self.cafes
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn current_edit(&self) -> Option<&Cafe> {
        self.current_edit.as_ref()
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<&Cafe> {
        self.pending_delete.as_ref()
    }

    /// Number of writes the backend has acknowledged this session.
    #[must_use]
    pub fn completed_writes(&self) -> u64 {
        self.completed_writes
    }

    /// Number of acknowledged adds, a subset of [`Self::completed_writes`].
    #[must_use]
    pub fn completed_adds(&self) -> u64 {
        self.completed_adds
    }

    #[must_use]
    pub fn flash(&self, slot: FlashSlot) -> Option<&Flash> {
        self.flash.get(slot)
    }
}

impl fmt::Debug for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminState")
            .field("logged_in", &self.token.is_some())
            .field("cafes", &self.cafes.len())
            .field("categories", &self.categories.len())
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

fn read_token(store: &dyn KeyValueStore) -> Option<String> {
    match store.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read stored token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpMethod;
    use crate::storage::MemoryKeyValueStore;
    use serde_json::json;

    fn gateway() -> ApiGateway {
        ApiGateway::new("http://api.test").unwrap()
    }

    fn logged_in() -> (AdminState, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::default();
        let handle = store.clone();
        let mut state = AdminState::new(gateway(), Box::new(store), 5.0);
        state.on_response(&HttpResponse::for_operation(
            Operation::Login,
            200,
            json!({"access_token": "tok"}).to_string(),
        ));
        (state, handle)
    }

    fn loaded() -> AdminState {
        let (mut state, _) = logged_in();
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCategories,
            200,
            json!([{"name": "WiFi"}, {"name": "Quiet"}]).to_string(),
        ));
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCafes,
            200,
            json!([
                {"id": 1, "title": "Old", "city": "Paris", "description": "d", "best_for": "WiFi"},
                {"id": 2, "title": "Other", "city": "Lyon", "description": "d", "best_for": "Quiet"}
            ])
            .to_string(),
        ));
        state
    }

    fn http(actions: &[Action]) -> Vec<&crate::api::HttpRequest> {
        actions.iter().filter_map(Action::as_http).collect()
    }

    fn form() -> CafeForm {
        CafeForm {
            title: "New".into(),
            city: "Paris".into(),
            description: "desc".into(),
            image_url: String::new(),
            best_for: "WiFi".into(),
            also_good_for: vec!["Quiet".into()],
        }
    }

    fn main_text(state: &AdminState) -> Option<String> {
        state.flash(FlashSlot::Main).map(|f| f.text.clone())
    }

    #[test]
    fn restores_stored_token() {
        let store = MemoryKeyValueStore::default();
        let mut handle = store.clone();
        handle.set(TOKEN_KEY, "saved").unwrap();

        let mut state = AdminState::new(gateway(), Box::new(store), 5.0);
        assert!(state.is_logged_in());
        let actions = state.init();
        assert_eq!(http(&actions)[0].operation, Operation::LoadCategories);
        assert!(state.is_loading());
    }

    #[test]
    fn init_without_token_issues_nothing() {
        let mut state = AdminState::new(gateway(), Box::new(MemoryKeyValueStore::default()), 5.0);
        assert!(state.init().is_empty());
        assert!(!state.is_logged_in());
    }

    #[test]
    fn attached_store_restores_token_before_loading() {
        let mut state = AdminState::new(gateway(), Box::new(MemoryKeyValueStore::default()), 5.0);
        assert!(!state.is_logged_in());

        let mut granted = MemoryKeyValueStore::default();
        granted.set(TOKEN_KEY, "saved").unwrap();
        state.attach_store(Box::new(granted));

        assert!(state.is_logged_in());
        assert_eq!(http(&state.init())[0].operation, Operation::LoadCategories);
    }

    #[test]
    fn attached_store_keeps_session_token() {
        let mut state = AdminState::new(gateway(), Box::new(MemoryKeyValueStore::default()), 5.0);
        state.login("ann", "secret");
        state.on_response(&HttpResponse::for_operation(
            Operation::Login,
            200,
            json!({"access_token": "tok"}).to_string(),
        ));

        let granted = MemoryKeyValueStore::default();
        let handle = granted.clone();
        state.attach_store(Box::new(granted));

        assert!(state.is_logged_in());
        assert_eq!(handle.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn login_persists_token_and_loads() {
        let store = MemoryKeyValueStore::default();
        let handle = store.clone();
        let mut state = AdminState::new(gateway(), Box::new(store), 5.0);

        let actions = state.login("ann", "secret");
        assert_eq!(http(&actions)[0].operation, Operation::Login);

        let actions = state.on_response(&HttpResponse::for_operation(
            Operation::Login,
            200,
            json!({"access_token": "tok"}).to_string(),
        ));
        assert_eq!(handle.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert_eq!(http(&actions)[0].operation, Operation::LoadCategories);

        let actions = state.on_response(&HttpResponse::for_operation(
            Operation::LoadCategories,
            200,
            "[]",
        ));
        let requests = http(&actions);
        assert_eq!(requests[0].operation, Operation::LoadCafes);
        assert_eq!(requests[0].headers["Authorization"], "Bearer tok");
    }

    #[test]
    fn failed_login_shows_auth_message() {
        let mut state = AdminState::new(gateway(), Box::new(MemoryKeyValueStore::default()), 5.0);
        let actions = state.on_response(&HttpResponse::for_operation(
            Operation::Login,
            400,
            json!({"detail": "LOGIN_BAD_CREDENTIALS"}).to_string(),
        ));
        assert!(matches!(actions[..], [Action::ScheduleTimeout { .. }]));
        assert_eq!(
            state.flash(FlashSlot::Auth).map(|f| f.text.as_str()),
            Some("Error: LOGIN_BAD_CREDENTIALS")
        );
        assert!(!state.is_logged_in());
    }

    #[test]
    fn writes_without_token_never_hit_the_network() {
        let mut state = AdminState::new(gateway(), Box::new(MemoryKeyValueStore::default()), 5.0);

        for actions in [
            state.add_cafe(&form()),
            state.update_cafe(&form()),
            state.delete_cafe(1),
        ] {
            assert!(http(&actions).is_empty());
            assert_eq!(main_text(&state).as_deref(), Some("Please login first"));
        }
    }

    #[test]
    fn invalid_form_is_reported_without_request() {
        let mut state = loaded();
        let mut bad = form();
        bad.best_for = "Dogs".into();
        let actions = state.add_cafe(&bad);
        assert!(http(&actions).is_empty());
        assert_eq!(main_text(&state).as_deref(), Some("Error: Invalid best_for: Dogs"));
    }

    #[test]
    fn add_then_refetch() {
        let mut state = loaded();
        let actions = state.add_cafe(&form());
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);

        let actions = state.on_response(&HttpResponse::for_operation(Operation::AddCafe, 201, "{}"));
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].operation, Operation::LoadCafes);
        assert_eq!(main_text(&state).as_deref(), Some("Cafe added successfully!"));
        assert_eq!(state.completed_writes(), 1);
        assert_eq!(state.completed_adds(), 1);
    }

    #[test]
    fn failed_write_keeps_list() {
        let mut state = loaded();
        let actions = state.on_response(&HttpResponse::for_operation(
            Operation::AddCafe,
            409,
            json!({"detail": "Cafe already exists"}).to_string(),
        ));
        assert!(http(&actions).is_empty());
        assert_eq!(state.cafes().len(), 2);
        assert_eq!(main_text(&state).as_deref(), Some("Error: Cafe already exists"));
    }

    #[test]
    fn update_uses_previously_loaded_key() {
        let mut state = loaded();
        assert!(state.edit_cafe(1));

        let mut renamed = CafeForm::from_cafe(state.current_edit().unwrap());
        renamed.title = "Renamed".into();
        renamed.city = "Nice".into();

        let actions = state.update_cafe(&renamed);
        let request = http(&actions)[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "http://api.test/cafes?title=Old&city=Paris");
        assert!(request.body_text().contains("\"Renamed\""));

        let actions =
            state.on_response(&HttpResponse::for_operation(Operation::UpdateCafe, 200, "{}"));
        assert!(state.current_edit().is_none());
        assert_eq!(http(&actions)[0].operation, Operation::LoadCafes);
    }

    #[test]
    fn update_without_target_is_rejected() {
        let mut state = loaded();
        let actions = state.update_cafe(&form());
        assert!(http(&actions).is_empty());
        assert_eq!(
            main_text(&state).as_deref(),
            Some("Error: No cafe selected for editing")
        );
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let mut state = loaded();
        assert!(state.delete_cafe(2).is_empty());
        assert_eq!(state.pending_delete().map(|c| c.id), Some(2));

        assert!(state.confirm_delete(false).is_empty());
        assert!(state.pending_delete().is_none());
        assert_eq!(state.cafes().len(), 2);
    }

    #[test]
    fn confirmed_delete_addresses_title_and_city() {
        let mut state = loaded();
        state.delete_cafe(2);
        let actions = state.confirm_delete(true);
        let request = http(&actions)[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "http://api.test/cafes?title=Other&city=Lyon");

        state.on_response(&HttpResponse::for_operation(Operation::DeleteCafe, 204, Vec::new()));
        assert_eq!(main_text(&state).as_deref(), Some("Cafe deleted successfully!"));
    }

    #[test]
    fn logout_clears_everything() {
        let (mut state, handle) = logged_in();
        state.logout();
        assert!(!state.is_logged_in());
        assert!(state.cafes().is_empty());
        assert_eq!(handle.get(TOKEN_KEY).unwrap(), None);

        // late responses from the old session are dropped
        let actions = state.on_response(&HttpResponse::for_operation(Operation::LoadCafes, 200, "[]"));
        assert!(actions.is_empty());
    }

    #[test]
    fn messages_expire_on_timer() {
        let mut state = loaded();
        state.add_cafe(&CafeForm::default());
        assert!(main_text(&state).is_some());
        state.expire_flash();
        assert!(main_text(&state).is_none());
    }
}
