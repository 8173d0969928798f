//! Filter controls of the public listing: the city/best-for bar, the chips of
//! selected "also good for" values, and the refine sidebar.

use crate::app::modes::ListingMode;
use crate::ui::helpers::{fill, position_cursor, truncate, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Chip, SelectOption};

/// Renders `City: [...]  Best for: ...` and returns the next row.
///
/// While the city input is focused its brackets take the input border color
/// and a cursor block is shown after the text.
pub fn render_filter_bar(
    row: usize,
    city: &str,
    best_for: &str,
    mode: ListingMode,
    theme: &Theme,
    cols: usize,
) -> usize {
    let editing = mode == ListingMode::CityInput;
    let bracket_color = if editing {
        &theme.colors.input_border
    } else {
        &theme.colors.border
    };
    let city = truncate(city, 24);
    let cursor = if editing { "█" } else { "" };

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!(" City: ");
    print!("{}[{}", Theme::fg(bracket_color), Theme::fg(&theme.colors.text_normal));
    print!("{city}{cursor}");
    print!("{}]", Theme::fg(bracket_color));
    let mut used = 7 + 1 + width(&city) + width(cursor) + 1;

    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("  Best for: ");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    let best_for = truncate(best_for, cols.saturating_sub(used + 12));
    print!("{best_for}");
    used += 12 + width(&best_for);

    fill(used, cols);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the selected chips as `[1 Quiet ×]`, or a dim placeholder.
pub fn render_chips(row: usize, chips: &[Chip], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!(" Also good for: ");
    let mut used = 16;

    if chips.is_empty() {
        print!("any");
        used += 3;
    }

    for chip in chips {
        let label = format!("{} {} ×", chip.index, chip.label);
        let label_len = width(&label) + 1;
        if used + label_len > cols {
            break;
        }
        print!("{}", Theme::fg(&theme.colors.chip_fg));
        print!("{}", Theme::bg(&theme.colors.chip_bg));
        print!("{label}");
        print!("{} ", Theme::reset());
        used += label_len;
    }

    fill(used, cols);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the refine sidebar starting at `row`, `col`, `panel_width` wide.
/// `picker_cursor` is set while the picker has focus.
pub fn render_sidebar(
    row: usize,
    col: usize,
    best_for: &[SelectOption],
    also_good_for: &[SelectOption],
    picker_cursor: Option<usize>,
    theme: &Theme,
    panel_width: usize,
) -> usize {
    let inner = panel_width.saturating_sub(2);
    let mut current_row = row;

    current_row = panel_line(current_row, col, "Best for", &theme.colors.header_fg, inner, theme);
    for option in best_for {
        let marker = if option.selected { "●" } else { "○" };
        let text = format!("{marker} {}", option.label);
        current_row = panel_line(current_row, col, &text, &theme.colors.text_normal, inner, theme);
    }

    current_row = panel_line(current_row, col, "", &theme.colors.text_dim, inner, theme);
    current_row = panel_line(current_row, col, "Also good for", &theme.colors.header_fg, inner, theme);
    for (i, option) in also_good_for.iter().enumerate() {
        let mark = if option.selected { "[x]" } else { "[ ]" };
        let text = format!("{mark} {}", option.label);
        position_cursor(current_row, col);
        print!("{}│{}", Theme::fg(&theme.colors.border), Theme::reset());
        if picker_cursor == Some(i) {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        let text = truncate(&text, inner);
        print!("{text}");
        fill(width(&text), inner);
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row
}

fn panel_line(row: usize, col: usize, text: &str, color: &str, inner: usize, theme: &Theme) -> usize {
    let text = truncate(text, inner);
    position_cursor(row, col);
    print!("{}│{}", Theme::fg(&theme.colors.border), Theme::fg(color));
    print!("{text}");
    fill(width(&text), inner);
    print!("{}", Theme::reset());
    row + 1
}
