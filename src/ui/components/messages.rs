//! Single-line messages: transient flashes, loading and error lines, and the
//! centered empty state.

use crate::app::flash::Tone;
use crate::ui::helpers::{fill, position_cursor, truncate, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::MessageLine;

/// Prints `text` in `color` on `row`, left-aligned with one space of margin.
pub fn render_line(row: usize, text: &str, color: &str, cols: usize) -> usize {
    let text = truncate(text, cols.saturating_sub(1));

    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!(" {text}");
    fill(width(&text) + 1, cols);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders an optional transient message. An absent message still takes the row
/// so the layout below does not jump.
pub fn render_message(row: usize, message: Option<&MessageLine>, theme: &Theme, cols: usize) -> usize {
    match message {
        Some(line) => {
            let color = match line.tone {
                Tone::Success => &theme.colors.success_fg,
                Tone::Error => &theme.colors.error_fg,
            };
            render_line(row, &line.text, color, cols)
        }
        None => render_line(row, "", &theme.colors.text_dim, cols),
    }
}

pub fn render_loading(row: usize, theme: &Theme, cols: usize) -> usize {
    render_line(row, "Loading cafes...", &theme.colors.text_dim, cols)
}

/// Centered message, used when nothing matches the filters.
pub fn render_empty_state(row: usize, message: &str, theme: &Theme, cols: usize) -> usize {
    let message = truncate(message, cols);
    let msg_len = width(&message);
    let msg_padding = cols.saturating_sub(msg_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", " ".repeat(msg_padding));
    print!("{message}");
    fill(msg_padding + msg_len, cols);
    print!("{}", Theme::reset());
    row + 1
}
