//! Zellij plugin entry point for the cafe console.
//!
//! This binary is the thin shim between Zellij and the `cafe_console` library:
//! it maps host events to [`cafe_console::Event`]s, forwards them to
//! [`handle_event`], and performs the returned [`Action`]s with host calls
//! (`web_request`, `set_timeout`, `hide_self`).
//!
//! # Lifecycle
//!
//! 1. `load`: parse configuration, start tracing, build the console, request
//!    permissions, subscribe to events
//! 2. `PermissionRequestResult`: on grant, the admin token store is opened and
//!    the console starts loading
//! 3. `update`: route key, web request and timer events
//! 4. `render`: draw the console
//!
//! # Permissions
//!
//! - `WebAccess`: talk to the cafe backend
//! - `FullHdAccess`: persist the admin token and write trace files

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use cafe_console::api::{HttpMethod, HttpRequest, HttpResponse};
use cafe_console::storage::{JsonKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use cafe_console::{handle_event, Action, Config, Console, Event, Key};

register_plugin!(State);

#[derive(Default)]
struct State {
    /// `None` until `load` succeeds, or if the configuration is unusable.
    console: Option<Console>,
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        cafe_console::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load", variant = ?config.variant);
        let _guard = span.entered();

        // File access is not granted yet; the persistent store is attached
        // once permissions arrive.
        let store = Box::new(MemoryKeyValueStore::default());
        match cafe_console::initialize(&config, store) {
            Ok(console) => self.console = Some(console),
            Err(e) => tracing::error!(error = %e, api_url = %config.api_url, "failed to initialize console"),
        }

        tracing::debug!("requesting permissions");
        request_permission(&[PermissionType::WebAccess, PermissionType::FullHdAccess]);

        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::Timer,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let Some(console) = self.console.as_mut() else {
            return false;
        };

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match Self::map_key(key) {
                Some(key) => Event::Key(key),
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, headers, body, context) => {
                tracing::debug!(status, body_len = body.len(), "web request completed");
                Event::HttpResponse(HttpResponse::from_parts(status, headers, body, &context))
            }
            zellij_tile::prelude::Event::Timer(_elapsed) => Event::TimerElapsed,
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Granted) => {
                tracing::debug!("permissions granted - loading");
                if console.admin_state().is_some() {
                    console.attach_store(open_store());
                }
                Event::PermissionsGranted
            }
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Denied) => {
                Event::PermissionsDenied
            }
            _ => return false,
        };

        let (should_render, actions) = handle_event(console, &our_event);
        tracing::debug!(action_count = actions.len(), should_render, "event handled");
        for action in &actions {
            Self::execute_action(action);
        }
        should_render
    }

    fn render(&mut self, rows: usize, cols: usize) {
        if let Some(console) = &self.console {
            cafe_console::ui::render(console, rows, cols);
        } else {
            println!("cafe-console: invalid configuration, see the trace file for details");
        }
    }
}

/// Token store backed by the plugin data directory. Falls back to memory when
/// the file cannot be opened, so the session still works without persistence.
fn open_store() -> Box<dyn KeyValueStore> {
    let path = cafe_console::infrastructure::credentials_file();
    match JsonKeyValueStore::open(path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "credential store unavailable, token will not persist");
            Box::new(MemoryKeyValueStore::default())
        }
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    fn map_key(key: &KeyWithModifier) -> Option<Key> {
        if key.has_modifiers(&[KeyModifier::Ctrl]) || key.has_modifiers(&[KeyModifier::Alt]) {
            return None;
        }

        Some(match key.bare_key {
            BareKey::Tab if key.has_modifiers(&[KeyModifier::Shift]) => Key::BackTab,
            BareKey::Tab => Key::Tab,
            BareKey::Enter => Key::Enter,
            BareKey::Esc => Key::Esc,
            BareKey::Backspace => Key::Backspace,
            BareKey::Up => Key::Up,
            BareKey::Down => Key::Down,
            BareKey::Left => Key::Left,
            BareKey::Right => Key::Right,
            BareKey::Char(c) => Key::Char(c),
            _ => return None,
        })
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("hiding plugin");
                hide_self();
            }
            Action::Http(request) => Self::send(request),
            Action::ScheduleTimeout { seconds } => {
                tracing::debug!(seconds, "arming message timer");
                set_timeout(*seconds);
            }
        }
    }

    fn send(request: &HttpRequest) {
        let verb = match request.method {
            HttpMethod::Get => HttpVerb::Get,
            HttpMethod::Post => HttpVerb::Post,
            HttpMethod::Put => HttpVerb::Put,
            HttpMethod::Delete => HttpVerb::Delete,
        };
        tracing::debug!(method = ?request.method, url = %request.url, operation = %request.operation, "sending request");
        web_request(
            &request.url,
            verb,
            request.headers.clone(),
            request.body.clone(),
            request.context(),
        );
    }
}
