//! Cafe table of the admin console.

use crate::ui::helpers::{fill, position_cursor, truncate, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::AdminRow;

/// Column widths as fractions of the pane: title, city, best for; the rest
/// goes to "also good for".
fn column_widths(cols: usize) -> [usize; 3] {
    let usable = cols.saturating_sub(2);
    [usable * 3 / 10, usable / 5, usable / 5]
}

pub fn render_table_headers(row: usize, theme: &Theme, cols: usize) -> usize {
    let [title, city, best] = column_widths(cols);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    let line = format!(
        "  {:<title$}{:<city$}{:<best$}{}",
        "TITLE", "CITY", "BEST FOR", "ALSO GOOD FOR"
    );
    let line = truncate(&line, cols);
    print!("{line}");
    fill(width(&line), cols);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the rows that fit up to `last_row`, scrolled to keep `selected`
/// visible. Returns the next free row.
pub fn render_table_rows(
    row: usize,
    last_row: usize,
    rows: &[AdminRow],
    selected: usize,
    theme: &Theme,
    cols: usize,
) -> usize {
    let fit = (last_row + 1).saturating_sub(row);
    if fit == 0 {
        return row;
    }
    let first = selected.saturating_sub(fit - 1);

    let mut current_row = row;
    for (i, item) in rows.iter().enumerate().skip(first).take(fit) {
        current_row = render_table_row(current_row, item, i == selected, theme, cols);
    }
    current_row
}

fn render_table_row(row: usize, item: &AdminRow, is_selected: bool, theme: &Theme, cols: usize) -> usize {
    let [title, city, best] = column_widths(cols);

    position_cursor(row, 1);
    if is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }

    let cell = |text: &str, w: usize| format!("{:<w$}", truncate(text, w.saturating_sub(1)));
    let line = format!(
        "  {}{}{}{}",
        cell(&item.title, title),
        cell(&item.city, city),
        cell(&item.best_for, best),
        item.also_good_for
    );
    let line = truncate(&line, cols);
    print!("{line}");
    fill(width(&line), cols);

    print!("{}", Theme::reset());
    row + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_leave_room_for_last_column() {
        let [title, city, best] = column_widths(102);
        assert_eq!((title, city, best), (30, 20, 20));
    }
}
