//! Top-level rendering coordinator.
//!
//! Every frame is a full rebuild of the pane: the active surface's view model
//! (already recomputed by its controller on the last notification) is handed to
//! the matching page layout.
//!
//! # Example
//!
//! ```rust
//! use cafe_console::api::ApiGateway;
//! use cafe_console::ui::render;
//! use cafe_console::{Console, Theme};
//!
//! let console = Console::listing(ApiGateway::new("http://127.0.0.1:8000")?, Theme::default());
//! render(&console, 24, 80); // Renders to stdout
//! # Ok::<(), cafe_console::ConsoleError>(())
//! ```

use crate::app::console::{Console, Surface};
use crate::ui::components;

/// Renders the console to stdout. `rows` and `cols` are the pane size.
pub fn render(console: &Console, rows: usize, cols: usize) {
    let _span = tracing::debug_span!("render", rows, cols).entered();

    match &console.surface {
        Surface::Listing { controller, .. } => {
            components::render_listing(controller, &console.theme, rows, cols);
        }
        Surface::Admin { controller, .. } => {
            components::render_admin(controller, &console.theme, rows, cols);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiGateway, HttpResponse, Operation};
    use crate::storage::MemoryKeyValueStore;
    use crate::ui::Theme;

    #[test]
    fn test_renders_every_listing_branch_without_panicking() {
        let gateway = ApiGateway::new("http://api.test").unwrap();
        let mut console = Console::listing(gateway, Theme::default());
        render(&console, 24, 80);

        let state = console.listing_state_mut().unwrap();
        state.init();
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCategories,
            200,
            r#"[{"name":"WiFi"}]"#,
        ));
        render(&console, 24, 80);

        let state = console.listing_state_mut().unwrap();
        state.on_response(&HttpResponse::for_operation(
            Operation::LoadCafes,
            200,
            r#"[{"id":1,"title":"Café São Paulo with a very long name indeed","city":"São Paulo","best_for":"WiFi"}]"#,
        ));
        state.set_city_query("paulo");
        render(&console, 24, 80);
        render(&console, 3, 10);
    }

    #[test]
    fn test_renders_admin_logged_out_and_tiny_panes() {
        let gateway = ApiGateway::new("http://api.test").unwrap();
        let console = Console::admin(
            gateway,
            Box::new(MemoryKeyValueStore::default()),
            5.0,
            Theme::default(),
        );
        render(&console, 24, 80);
        render(&console, 1, 1);
    }
}
