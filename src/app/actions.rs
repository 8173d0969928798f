//! Actions representing side effects to be executed by the plugin runtime.
//!
//! State methods never touch the host. They return a `Vec<Action>` and the
//! plugin shim (`main.rs`) performs each action in order. This keeps the whole
//! application layer runnable in native unit tests.
//!
//! # Example
//!
//! ```rust
//! use cafe_console::api::ApiGateway;
//! use cafe_console::Action;
//!
//! let gateway = ApiGateway::new("http://127.0.0.1:8000")?;
//! let actions = vec![Action::Http(gateway.load_categories())];
//! # Ok::<(), cafe_console::ConsoleError>(())
//! ```

use crate::api::HttpRequest;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane (the user pressed `q`).
    CloseFocus,

    /// Issues an HTTP request. The completion comes back later as an
    /// `Event::HttpResponse` carrying the same operation tag.
    Http(HttpRequest),

    /// Arms a one-shot timer. Used to expire transient messages.
    ScheduleTimeout {
        /// Delay in seconds.
        seconds: f64,
    },
}

impl Action {
    /// Returns the request if this action is an HTTP call.
    #[must_use]
    pub const fn as_http(&self) -> Option<&HttpRequest> {
        match self {
            Self::Http(request) => Some(request),
            _ => None,
        }
    }
}
