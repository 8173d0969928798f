//! User interface layer.
//!
//! ```text
//! State ──notify──▶ Controller ──compute──▶ View model ──render──▶ ANSI output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready data computed from state
//! - [`controller`]: Key handling and view recomputation on notification
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Page layouts and composable components
//! - [`helpers`]: Cursor positioning, truncation and highlighting
//! - [`theme`]: Color schemes and ANSI escape sequences

pub mod components;
pub mod controller;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use controller::{AdminController, ListingController};
pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{AdminView, CardItem, ListingView, ResultsBody};
