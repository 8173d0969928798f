//! Cafe cards of the public listing.
//!
//! A card is [`CARD_HEIGHT`] rows: title and rating, city and best-for,
//! also-good-for, description, image URL, then a spacer.

use crate::ui::helpers::{self, fill, position_cursor, truncate, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::CardItem;

pub const CARD_HEIGHT: usize = 6;

/// Renders as many cards as fit between `row` and `last_row` (inclusive),
/// scrolled so that `selected` is visible. Returns the next free row.
pub fn render_cards(
    row: usize,
    last_row: usize,
    cards: &[CardItem],
    selected: usize,
    theme: &Theme,
    cols: usize,
) -> usize {
    let fit = (last_row + 1).saturating_sub(row) / CARD_HEIGHT;
    if fit == 0 {
        return row;
    }
    let first = selected.saturating_sub(fit - 1);

    let mut current_row = row;
    for (i, card) in cards.iter().enumerate().skip(first).take(fit) {
        current_row = render_card(current_row, card, i == selected, theme, cols);
    }
    current_row
}

fn render_card(row: usize, card: &CardItem, is_selected: bool, theme: &Theme, cols: usize) -> usize {
    let inner = cols.saturating_sub(3);
    let marker = if is_selected { "▌" } else { " " };

    position_cursor(row, 1);
    print!("{}{marker} ", Theme::fg(&theme.colors.selection_bg));
    if is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
    print!("{}", Theme::bold());
    let rating_len = width(&card.rating);
    let title = truncate(&card.title, inner.saturating_sub(rating_len + 1));
    print!("{title}");
    print!("{}", Theme::reset());
    fill(2 + width(&title) + rating_len + 1, cols);
    print!("{}{} ", Theme::fg(&theme.colors.rating_fg), card.rating);
    print!("{}", Theme::reset());

    position_cursor(row + 1, 1);
    print!("{}{marker} ", Theme::fg(&theme.colors.selection_bg));
    print!("{}", Theme::fg(&theme.colors.text_normal));
    let city = truncate(&card.city, inner / 2);
    if width(&city) == width(&card.city) {
        helpers::render_highlighted_text(&city, &card.city_highlight, theme, false);
    } else {
        print!("{city}");
    }
    let best_for = truncate(&card.best_for, inner.saturating_sub(width(&city) + 13));
    print!("{}  Best for: ", Theme::fg(&theme.colors.text_dim));
    print!("{}{best_for}", Theme::fg(&theme.colors.text_normal));
    fill(2 + width(&city) + 12 + width(&best_for), cols);
    print!("{}", Theme::reset());

    let also = format!("Also good for: {}", card.also_good_for);
    detail_line(row + 2, marker, &also, &theme.colors.text_dim, theme, cols);
    detail_line(row + 3, marker, &card.description, &theme.colors.text_normal, theme, cols);
    detail_line(row + 4, marker, &card.image, &theme.colors.text_dim, theme, cols);

    position_cursor(row + 5, 1);
    fill(0, cols);

    row + CARD_HEIGHT
}

fn detail_line(row: usize, marker: &str, text: &str, color: &str, theme: &Theme, cols: usize) {
    let text = truncate(text, cols.saturating_sub(3));
    position_cursor(row, 1);
    print!("{}{marker} ", Theme::fg(&theme.colors.selection_bg));
    print!("{}{text}", Theme::fg(color));
    fill(2 + width(&text), cols);
    print!("{}", Theme::reset());
}
