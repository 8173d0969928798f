//! Application layer coordinating state, events, and actions.
//!
//! ```text
//! Key ──▶ Controller ──▶ State setter ──▶ notify ──▶ View model ──▶ render
//!                            │
//!                            └──▶ Action::Http ──▶ host ──▶ Event::HttpResponse
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands returned to the plugin runtime
//! - [`admin`]: Admin console state (auth and writes)
//! - [`console`]: Per-session context owning state and controller
//! - [`filter`]: Filter engine
//! - [`flash`]: Transient messages with timed expiry
//! - [`form`]: Admin forms and client-side validation
//! - [`handler`]: Event routing
//! - [`listing`]: Public listing state
//! - [`modes`]: Controller input modes
//! - [`notifier`]: Subscriber lists
//! - [`relevance`]: Relevance sorter

pub mod actions;
pub mod admin;
pub mod console;
pub mod filter;
pub mod flash;
pub mod form;
pub mod handler;
pub mod listing;
pub mod modes;
pub mod notifier;
pub mod relevance;

pub use actions::Action;
pub use admin::AdminState;
pub use console::{Console, Surface};
pub use filter::{filter, FilterCriteria};
pub use handler::{handle_event, Event, Key};
pub use listing::{ListingState, LoadPhase};
pub use relevance::sort_by_relevance;
