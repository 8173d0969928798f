//! Event handling and dispatch.
//!
//! The plugin shim translates host events into [`Event`]s and hands them to
//! [`handle_event`], which routes them to the active console surface and returns
//! whether the pane must be redrawn plus the actions to execute.
//!
//! # Event Types
//!
//! - **Input**: `Key`
//! - **Network**: `HttpResponse`, routed by its operation tag
//! - **System**: `TimerElapsed`, `PermissionsGranted`, `PermissionsDenied`
//!
//! # Example
//!
//! ```rust
//! use cafe_console::api::ApiGateway;
//! use cafe_console::{handle_event, Console, Event, Theme};
//!
//! let gateway = ApiGateway::new("http://127.0.0.1:8000")?;
//! let mut console = Console::listing(gateway, Theme::default());
//! let (render, actions) = handle_event(&mut console, &Event::PermissionsGranted);
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), cafe_console::ConsoleError>(())
//! ```

use crate::api::HttpResponse;
use crate::app::actions::Action;
use crate::app::console::{Console, Surface};

/// Keys the consoles react to, independent of the host's key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
}

/// Events triggered by user input, network completions or the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    /// A request issued through [`Action::Http`] completed.
    HttpResponse(HttpResponse),
    /// A timer armed through [`Action::ScheduleTimeout`] fired.
    TimerElapsed,
    /// Web access was granted; the console starts loading.
    PermissionsGranted,
    PermissionsDenied,
}

/// Processes one event and returns `(should_render, actions)`.
///
/// State mutation and the resulting notifications complete before this
/// function returns, so a render never observes a half-applied update.
pub fn handle_event(console: &mut Console, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_name(event)).entered();

    match &mut console.surface {
        Surface::Listing { state, controller } => {
            let (local, actions) = match event {
                Event::Key(key) => controller.handle_key(state, key),
                Event::HttpResponse(response) => (false, state.on_response(response)),
                Event::PermissionsGranted => (false, state.init()),
                Event::TimerElapsed => (false, vec![]),
                Event::PermissionsDenied => {
                    tracing::warn!("web access denied - listing cannot load");
                    (false, vec![])
                }
            };
            let render = controller.take_dirty() | local;
            tracing::debug!(render, action_count = actions.len(), "listing event handled");
            (render, actions)
        }
        Surface::Admin { state, controller } => {
            let (local, actions) = match event {
                Event::Key(key) => controller.handle_key(state, key),
                Event::HttpResponse(response) => (false, state.on_response(response)),
                Event::PermissionsGranted => (false, state.init()),
                Event::TimerElapsed => {
                    state.expire_flash();
                    (false, vec![])
                }
                Event::PermissionsDenied => {
                    tracing::warn!("web access denied - admin console cannot load");
                    (false, vec![])
                }
            };
            let reconciled = controller.reconcile(state);
            let render = controller.take_dirty() | local | reconciled;
            tracing::debug!(render, action_count = actions.len(), "admin event handled");
            (render, actions)
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Key(_) => "Key",
        Event::HttpResponse(_) => "HttpResponse",
        Event::TimerElapsed => "TimerElapsed",
        Event::PermissionsGranted => "PermissionsGranted",
        Event::PermissionsDenied => "PermissionsDenied",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiGateway, HttpMethod, HttpRequest, Operation};
    use crate::app::flash::FlashSlot;
    use crate::app::modes::AdminMode;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use crate::ui::viewmodel::ResultsBody;
    use crate::ui::Theme;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn http(actions: &[Action]) -> Vec<&HttpRequest> {
        actions.iter().filter_map(Action::as_http).collect()
    }

    fn respond(console: &mut Console, operation: Operation, status: u16, body: &str) -> (bool, Vec<Action>) {
        let response = HttpResponse::for_operation(operation, status, body);
        handle_event(console, &Event::HttpResponse(response))
    }

    fn press(console: &mut Console, key: Key) -> (bool, Vec<Action>) {
        handle_event(console, &Event::Key(key))
    }

    fn type_text(console: &mut Console, text: &str) {
        for c in text.chars() {
            press(console, Key::Char(c));
        }
    }

    fn admin_count_label(console: &Console) -> String {
        match &console.surface {
            Surface::Admin { controller, .. } => controller.view().count_label.clone(),
            Surface::Listing { .. } => panic!("expected admin console"),
        }
    }

    fn logged_in_admin() -> (Console, MemoryKeyValueStore) {
        let mut store = MemoryKeyValueStore::default();
        store.set("token", "t").unwrap();
        let console = Console::admin(
            ApiGateway::new(BASE).unwrap(),
            Box::new(store.clone()),
            5.0,
            Theme::default(),
        );
        (console, store)
    }

    #[test]
    fn add_cafe_posts_once_refetches_once_and_rerenders_with_new_count() {
        let (mut console, _store) = logged_in_admin();

        let (_, actions) = handle_event(&mut console, &Event::PermissionsGranted);
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://api.test/categories");

        let (_, actions) = respond(
            &mut console,
            Operation::LoadCategories,
            200,
            r#"[{"name":"WiFi"},{"name":"Quiet"}]"#,
        );
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://api.test/cafes");

        let (render, _) = respond(&mut console, Operation::LoadCafes, 200, "[]");
        assert!(render);
        assert_eq!(admin_count_label(&console), "Cafes (0)");

        press(&mut console, Key::Char('a'));
        type_text(&mut console, "Bean There");
        press(&mut console, Key::Tab);
        type_text(&mut console, "Paris");
        press(&mut console, Key::Tab);
        type_text(&mut console, "Good coffee");
        press(&mut console, Key::Tab); // image URL stays empty
        press(&mut console, Key::Tab);
        press(&mut console, Key::Right); // best for: WiFi
        press(&mut console, Key::Tab);
        press(&mut console, Key::Right); // cursor on Quiet
        press(&mut console, Key::Char(' '));

        let (_, actions) = press(&mut console, Key::Enter);
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        let post = requests[0];
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.url, "http://api.test/cafes");
        assert_eq!(post.headers.get("Authorization").map(String::as_str), Some("Bearer t"));
        let payload: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
        assert_eq!(
            payload,
            json!({
                "title": "Bean There",
                "city": "Paris",
                "description": "Good coffee",
                "image_url": null,
                "best_for": "WiFi",
                "also_good_for": ["Quiet"],
            })
        );

        let (_, actions) = respond(&mut console, Operation::AddCafe, 201, r#"{"id":1}"#);
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://api.test/cafes");

        let (render, actions) = respond(
            &mut console,
            Operation::LoadCafes,
            200,
            r#"[{"id":1,"title":"Bean There","city":"Paris","description":"Good coffee","best_for":"WiFi","also_good_for":["Quiet"]}]"#,
        );
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(admin_count_label(&console), "Cafes (1)");

        let Surface::Admin { controller, .. } = &console.surface else {
            unreachable!()
        };
        assert_eq!(controller.mode(), AdminMode::Browse);
        assert_eq!(
            controller.view().message.as_ref().map(|m| m.text.as_str()),
            Some("Cafe added successfully!")
        );
    }

    #[test]
    fn login_persists_token_and_loads() {
        let store = MemoryKeyValueStore::default();
        let mut console = Console::admin(
            ApiGateway::new(BASE).unwrap(),
            Box::new(store.clone()),
            5.0,
            Theme::default(),
        );

        let (_, actions) = handle_event(&mut console, &Event::PermissionsGranted);
        assert!(actions.is_empty());

        type_text(&mut console, "admin@example.com");
        press(&mut console, Key::Tab);
        type_text(&mut console, "secret");
        let (_, actions) = press(&mut console, Key::Enter);
        let requests = http(&actions);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://api.test/auth/jwt/login");

        let (_, actions) = respond(&mut console, Operation::Login, 200, r#"{"access_token":"abc"}"#);
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(http(&actions)[0].url, "http://api.test/categories");
        assert!(console.admin_state().unwrap().is_logged_in());
    }

    #[test]
    fn failed_write_keeps_list_and_expires_message() {
        let (mut console, _store) = logged_in_admin();
        handle_event(&mut console, &Event::PermissionsGranted);
        respond(&mut console, Operation::LoadCategories, 200, r#"[{"name":"WiFi"}]"#);
        respond(
            &mut console,
            Operation::LoadCafes,
            200,
            r#"[{"id":4,"title":"Old","city":"Rome","description":"d","best_for":"WiFi","also_good_for":[]}]"#,
        );

        press(&mut console, Key::Char('d'));
        let (_, actions) = press(&mut console, Key::Char('y'));
        let requests = http(&actions);
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].url, "http://api.test/cafes?title=Old&city=Rome");

        let (_, actions) = respond(&mut console, Operation::DeleteCafe, 404, r#"{"detail":"Cafe not found"}"#);
        assert!(http(&actions).is_empty());
        assert!(actions.contains(&Action::ScheduleTimeout { seconds: 5.0 }));
        assert_eq!(admin_count_label(&console), "Cafes (1)");

        let message = |console: &Console| {
            console
                .admin_state()
                .and_then(|s| s.flash(FlashSlot::Main))
                .map(|f| f.text.clone())
        };
        assert_eq!(message(&console).as_deref(), Some("Error: Cafe not found"));

        let (render, _) = handle_event(&mut console, &Event::TimerElapsed);
        assert!(render);
        assert_eq!(message(&console), None);
    }

    #[test]
    fn listing_filters_by_keyboard_and_reports_counts() {
        let mut console = Console::listing(ApiGateway::new(BASE).unwrap(), Theme::default());

        let (_, actions) = handle_event(&mut console, &Event::PermissionsGranted);
        assert_eq!(http(&actions)[0].url, "http://api.test/categories");
        respond(&mut console, Operation::LoadCategories, 200, r#"[{"name":"WiFi"},{"name":"Tea"}]"#);
        let (render, _) = respond(
            &mut console,
            Operation::LoadCafes,
            200,
            r#"[
                {"id":1,"title":"A","city":"Paris","best_for":"Tea","also_good_for":["WiFi"]},
                {"id":2,"title":"B","city":"Paris","best_for":"Coffee","also_good_for":[]},
                {"id":3,"title":"C","city":"Lyon","best_for":{"name":"WiFi"},"also_good_for":[{"name":"Tea"}]}
            ]"#,
        );
        assert!(render);

        let label = |console: &Console| match &console.surface {
            Surface::Listing { controller, .. } => controller.view().results_label.clone(),
            Surface::Admin { .. } => unreachable!(),
        };
        assert_eq!(label(&console), "Found 3 cafes");

        press(&mut console, Key::Char('/'));
        type_text(&mut console, "  PARIS ");
        press(&mut console, Key::Enter);
        assert_eq!(label(&console), "Found 2 cafes");

        let Surface::Listing { state, .. } = &console.surface else {
            unreachable!()
        };
        let titles: Vec<&str> = state.filtered_cafes().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);

        press(&mut console, Key::Char('r'));
        assert_eq!(label(&console), "Found 3 cafes");
    }

    #[test]
    fn listing_load_failure_shows_error_and_keeps_list_empty() {
        let mut console = Console::listing(ApiGateway::new(BASE).unwrap(), Theme::default());
        handle_event(&mut console, &Event::PermissionsGranted);

        let transport = HttpResponse::from_parts(
            400,
            Default::default(),
            b"connection refused".to_vec(),
            &[("operation".to_string(), "load_categories".to_string())].into_iter().collect(),
        );
        let (render, actions) = handle_event(&mut console, &Event::HttpResponse(transport));
        assert!(render);
        assert!(actions.is_empty());

        let Surface::Listing { state, controller } = &console.surface else {
            unreachable!()
        };
        assert!(state.cafes().is_empty());
        assert_eq!(
            controller.view().body,
            ResultsBody::Error("Error: Initialization error: Network error: connection refused".to_string())
        );
    }

    #[test]
    fn granted_store_token_logs_in_before_loading() {
        let mut console = Console::admin(
            ApiGateway::new(BASE).unwrap(),
            Box::new(MemoryKeyValueStore::default()),
            5.0,
            Theme::default(),
        );

        let mut granted = MemoryKeyValueStore::default();
        granted.set("token", "saved").unwrap();
        console.attach_store(Box::new(granted));

        let (render, actions) = handle_event(&mut console, &Event::PermissionsGranted);
        assert!(render);
        assert_eq!(http(&actions)[0].url, "http://api.test/categories");
        assert!(console.admin_state().unwrap().is_logged_in());
    }
}
