//! The per-session console context.
//!
//! A [`Console`] owns exactly one application state and the controller
//! subscribed to it. There is no global state: the plugin shim constructs one
//! console in `load` and passes it by reference to the event handler and the
//! renderer.

use crate::api::ApiGateway;
use crate::app::admin::AdminState;
use crate::app::listing::ListingState;
use crate::storage::KeyValueStore;
use crate::ui::controller::{AdminController, ListingController};
use crate::ui::Theme;

/// Which page the plugin instance shows.
#[derive(Debug)]
pub enum Surface {
    Listing {
        state: ListingState,
        controller: ListingController,
    },
    Admin {
        state: AdminState,
        controller: AdminController,
    },
}

#[derive(Debug)]
pub struct Console {
    pub surface: Surface,
    pub theme: Theme,
}

impl Console {
    /// Builds the public listing console.
    #[must_use]
    pub fn listing(gateway: ApiGateway, theme: Theme) -> Self {
        let mut state = ListingState::new(gateway);
        let controller = ListingController::attach(&mut state);
        Self {
            surface: Surface::Listing { state, controller },
            theme,
        }
    }

    /// Builds the admin console; the stored token (if any) is read from `store`.
    #[must_use]
    pub fn admin(
        gateway: ApiGateway,
        store: Box<dyn KeyValueStore>,
        flash_seconds: f64,
        theme: Theme,
    ) -> Self {
        let mut state = AdminState::new(gateway, store, flash_seconds);
        let controller = AdminController::attach(&mut state);
        Self {
            surface: Surface::Admin { state, controller },
            theme,
        }
    }

    /// Hands a persistent token store to the admin page. The listing holds no
    /// credentials and drops it.
    pub fn attach_store(&mut self, store: Box<dyn KeyValueStore>) {
        if let Surface::Admin { state, .. } = &mut self.surface {
            state.attach_store(store);
        }
    }

    #[must_use]
    pub fn listing_state(&self) -> Option<&ListingState> {
        match &self.surface {
            Surface::Listing { state, .. } => Some(state),
            Surface::Admin { .. } => None,
        }
    }

    pub fn listing_state_mut(&mut self) -> Option<&mut ListingState> {
        match &mut self.surface {
            Surface::Listing { state, .. } => Some(state),
            Surface::Admin { .. } => None,
        }
    }

    #[must_use]
    pub fn admin_state(&self) -> Option<&AdminState> {
        match &self.surface {
            Surface::Admin { state, .. } => Some(state),
            Surface::Listing { .. } => None,
        }
    }
}
