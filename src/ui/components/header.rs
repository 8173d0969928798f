//! Header component: centered title with a right-aligned status.

use crate::ui::helpers::{fill, position_cursor, truncate, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header on `row` and returns the next row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate(&header.title, cols);
    let title_len = width(&title);
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");

    let used = padding + title_len;
    let status_len = width(&header.status);
    if !header.status.is_empty() && used + status_len + 2 <= cols {
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        fill(used + status_len + 1, cols);
        print!("{} ", header.status);
    } else {
        fill(used, cols);
    }

    print!("{}", Theme::reset());
    row + 1
}
