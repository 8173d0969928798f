//! Composable UI components and the two page layouts.
//!
//! Components print at absolute positions and return the next free row, so a
//! layout is a straight sequence of calls.
//!
//! # Layout (listing)
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header: Cafe Directory   Found N     │
//! ├──────────────────────────────────────┤
//! │ City: [...]  Best for: ...           │
//! │ Also good for: [1 Quiet ×]           │
//! ├──────────────────────────┬───────────┤
//! │ Cards                    │ Sidebar   │
//! ├──────────────────────────┴───────────┤
//! │ Footer: keybindings                  │
//! └──────────────────────────────────────┘
//! ```

mod admin_table;
mod cards;
mod filters;
mod footer;
mod forms;
mod header;
mod messages;

use crate::app::modes::{AdminMode, ListingMode, CONFIRM_HINTS, LOGIN_HINTS};
use crate::ui::controller::{AdminController, ListingController};
use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, HeaderInfo, ResultsBody};

use admin_table::{render_table_headers, render_table_rows};
use cards::render_cards;
use filters::{render_chips, render_filter_bar, render_sidebar};
use footer::render_footer;
use forms::{render_cafe_form, render_login_form};
use header::render_header;
use messages::{render_empty_state, render_line, render_loading, render_message};

const SIDEBAR_WIDTH: usize = 26;

fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

fn render_bottom(hints: &str, theme: &Theme, rows: usize, cols: usize) {
    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(
        footer_start,
        &FooterInfo {
            keybindings: hints.to_string(),
        },
        theme,
        cols,
    );
}

pub fn render_listing(controller: &ListingController, theme: &Theme, rows: usize, cols: usize) {
    let view = controller.view();
    let mode = controller.mode();
    let mut current_row = 2;

    let header = HeaderInfo {
        title: "Cafe Directory".to_string(),
        status: view.results_label.clone(),
    };
    current_row = render_header(current_row, &header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    let city = if mode == ListingMode::CityInput {
        controller.city_input()
    } else {
        view.city_query.as_str()
    };
    let best_for = view
        .best_for_options
        .iter()
        .find(|o| o.selected)
        .map_or("", |o| o.label.as_str());
    current_row = render_filter_bar(current_row, city, best_for, mode, theme, cols);
    current_row = render_chips(current_row, &view.chips, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    let show_sidebar = (view.sidebar_visible || mode == ListingMode::Picker) && cols > SIDEBAR_WIDTH * 2;
    let main_cols = if show_sidebar { cols - SIDEBAR_WIDTH } else { cols };
    if show_sidebar {
        let cursor = (mode == ListingMode::Picker).then(|| controller.picker_cursor());
        render_sidebar(
            current_row,
            main_cols + 1,
            &view.best_for_options,
            &view.also_good_for_options,
            cursor,
            theme,
            SIDEBAR_WIDTH,
        );
    }

    let last_row = rows.saturating_sub(3);
    if view.loading_visible {
        current_row = render_loading(current_row, theme, main_cols);
    }
    match &view.body {
        ResultsBody::Error(message) => {
            render_line(current_row, message, &theme.colors.error_fg, main_cols);
        }
        ResultsBody::Cards(cards) => {
            render_cards(current_row, last_row, cards, controller.selected(), theme, main_cols);
        }
        ResultsBody::Empty(message) => {
            render_empty_state(current_row + 1, message, theme, main_cols);
        }
    }

    render_bottom(mode.hints(), theme, rows, cols);
}

pub fn render_admin(controller: &AdminController, theme: &Theme, rows: usize, cols: usize) {
    let view = controller.view();
    let mut current_row = 2;

    let header = HeaderInfo {
        title: "Cafe Admin".to_string(),
        status: if view.logged_in {
            view.count_label.clone()
        } else {
            "Logged out".to_string()
        },
    };
    current_row = render_header(current_row, &header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    if !view.logged_in {
        current_row = render_line(current_row, "Login", &theme.colors.header_fg, cols);
        current_row = render_login_form(current_row, controller.login_form(), theme, cols);
        render_message(current_row + 1, view.auth_message.as_ref(), theme, cols);
        render_bottom(LOGIN_HINTS, theme, rows, cols);
        return;
    }

    current_row = render_message(current_row, view.auth_message.as_ref(), theme, cols);
    current_row = render_message(current_row, view.message.as_ref(), theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    let last_row = rows.saturating_sub(3);
    match controller.mode() {
        AdminMode::Browse if view.loading => {
            render_loading(current_row, theme, cols);
        }
        AdminMode::Browse => {
            current_row = render_table_headers(current_row, theme, cols);
            let table_end = if view.confirm_delete.is_some() {
                last_row.saturating_sub(1)
            } else {
                last_row
            };
            render_table_rows(current_row, table_end, &view.rows, controller.selected(), theme, cols);
        }
        AdminMode::Adding | AdminMode::Editing => {
            let heading = view
                .editing
                .as_ref()
                .map_or_else(|| "Add Cafe".to_string(), |title| format!("Edit Cafe: {title}"));
            render_cafe_form(
                current_row,
                &heading,
                controller.form(),
                controller.field(),
                &view.categories,
                controller.also_cursor(),
                theme,
                cols,
            );
        }
    }

    if let Some(prompt) = &view.confirm_delete {
        render_line(last_row, prompt, &theme.colors.error_fg, cols);
        render_bottom(CONFIRM_HINTS, theme, rows, cols);
    } else {
        render_bottom(controller.mode().hints(), theme, rows, cols);
    }
}
