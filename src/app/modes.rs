//! Input mode state types for the two consoles.
//!
//! Modes decide which keybindings are active and which footer hints are shown.
//! They belong to the controllers, not to the application state: switching
//! modes never notifies subscribers.
//!
//! # Example
//!
//! ```rust
//! use cafe_console::app::modes::{AdminMode, ListingMode};
//!
//! let listing = ListingMode::CityInput;
//! let admin = AdminMode::Editing;
//! assert_ne!(listing, ListingMode::Browse);
//! assert_ne!(admin, AdminMode::Browse);
//! ```

/// Input mode of the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// Navigating cards and changing filters with single keys.
    ///
    /// Available keybindings: j/k (move), / (city), b/B (best for),
    /// tab (also good for), 1-9 (remove chip), r (reset), R (reload), q (quit).
    #[default]
    Browse,

    /// Typing into the city filter. Each keystroke updates the filter.
    CityInput,

    /// Toggling entries of the "also good for" multi-select.
    Picker,
}

impl ListingMode {
    #[must_use]
    pub const fn hints(self) -> &'static str {
        match self {
            Self::Browse => {
                "j/k: move | /: city | b/B: best for | tab: also good for | 1-9: remove tag | r: reset | R: reload | q: quit"
            }
            Self::CityInput => "type to filter | enter: done | esc: cancel",
            Self::Picker => "j/k: move | space: toggle | enter/esc: done",
        }
    }
}

/// Input mode of the admin console once logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminMode {
    /// Cafe table with selection.
    #[default]
    Browse,

    /// Filling in the add form.
    Adding,

    /// Filling in the edit form for the current edit target.
    Editing,
}

impl AdminMode {
    #[must_use]
    pub const fn hints(self) -> &'static str {
        match self {
            Self::Browse => "j/k: move | a: add | e: edit | d: delete | R: reload | L: logout | q: quit",
            Self::Adding | Self::Editing => {
                "tab/shift-tab: field | ←/→: choose | space: toggle | enter: save | esc: cancel"
            }
        }
    }
}

/// Footer hints of the login form.
pub const LOGIN_HINTS: &str = "tab: switch field | enter: login | esc: quit";

/// Footer hints while a delete confirmation is pending.
pub const CONFIRM_HINTS: &str = "y: delete | any other key: keep";
