//! Cafe Console: a Zellij plugin for browsing and administering a cafe directory.
//!
//! One plugin binary serves two pages, selected by the `variant` setting:
//! - **listing**: public, read-only cafe cards with city, "best for" and
//!   "also good for" filters and relevance ordering
//! - **admin**: token-authenticated console to add, edit and delete cafes
//!
//! Both talk to the same REST backend through Zellij's web request API.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event / Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Listing and admin state with subscribers         │
//! │  - Filter engine and relevance sorter               │
//! │  - Event handling                                   │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Storage Layer │
//! │ (ui/)         │   │ (api/)        │   │ (storage/)    │
//! │ - Controllers │   │ - Requests    │   │ - Key-value   │
//! │ - View models │   │ - Decoding    │   │ - JSON file   │
//! │ - Components  │   │ - Errors      │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Cafe, Category, payloads, normalization, errors  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The library never calls Zellij host functions. State methods return
//! [`Action`]s and the shim performs them, so everything here runs in native
//! tests.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use cafe_console::storage::MemoryKeyValueStore;
//! use cafe_console::{handle_event, initialize, Config, Event};
//!
//! let config = Config::from_zellij(&BTreeMap::from([
//!     ("variant".to_string(), "admin".to_string()),
//! ]));
//! let mut console = initialize(&config, Box::new(MemoryKeyValueStore::default()))?;
//! let (render, actions) = handle_event(&mut console, &Event::PermissionsGranted);
//! assert!(render);
//! assert!(actions.is_empty()); // no stored token: login form, nothing fetched
//! # Ok::<(), cafe_console::ConsoleError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Console, Event, Key, Surface};
pub use domain::{ConsoleError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::api::ApiGateway;
use crate::app::flash::DEFAULT_FLASH_SECONDS;
use crate::storage::KeyValueStore;

/// Backend used when `api_url` is not configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Which page this plugin instance shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Listing,
    Admin,
}

/// Plugin configuration parsed from the Zellij layout.
///
/// ```kdl
/// plugin location="file:cafe-console.wasm" {
///     variant "admin"
///     api_url "http://127.0.0.1:8000"
///     theme "catppuccin-latte"
///     message_timeout "5"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub variant: Variant,

    /// Base URL of the REST backend.
    pub api_url: String,

    /// Built-in theme name. Ignored when `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom theme TOML; `~` means the host home directory.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for the trace exporter, default `info`.
    pub trace_level: Option<String>,

    /// Seconds a transient message stays visible.
    pub message_timeout: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            api_url: DEFAULT_API_URL.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
            message_timeout: DEFAULT_FLASH_SECONDS,
        }
    }
}

impl Config {
    /// Parses the Zellij configuration map. Unknown or malformed values fall back
    /// to their defaults.
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let variant = match config.get("variant").map(|v| v.trim().to_ascii_lowercase()) {
            None => Variant::default(),
            Some(v) if v == "admin" => Variant::Admin,
            Some(v) if v == "listing" => Variant::Listing,
            Some(v) => {
                tracing::debug!(variant = %v, "unknown variant, using listing");
                Variant::Listing
            }
        };

        let api_url = config
            .get("api_url")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let message_timeout = config
            .get("message_timeout")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or(DEFAULT_FLASH_SECONDS);

        Self {
            variant,
            api_url,
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
            message_timeout,
        }
    }
}

/// Builds the console for `config`. `store` persists the admin token and is
/// unused by the listing.
///
/// A theme that fails to load falls back to the default theme.
///
/// # Errors
///
/// Returns [`ConsoleError::Url`] or [`ConsoleError::Config`] if `api_url` is
/// not a usable base URL.
pub fn initialize(config: &Config, store: Box<dyn KeyValueStore>) -> Result<Console> {
    let _span = tracing::debug_span!("initialize", variant = ?config.variant, api_url = %config.api_url).entered();

    let theme_file = config
        .theme_file
        .as_deref()
        .map(|f| PathBuf::from(infrastructure::expand_tilde(f)));
    let theme = Theme::resolve(config.theme_name.as_deref(), theme_file.as_deref()).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "failed to load theme from file, using default");
        Theme::default()
    });

    let gateway = ApiGateway::new(&config.api_url)?;

    Ok(match config.variant {
        Variant::Listing => Console::listing(gateway, theme),
        Variant::Admin => Console::admin(gateway, store, config.message_timeout, theme),
    })
}
