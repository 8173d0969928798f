//! Login form and add/edit cafe form of the admin console.

use crate::app::form::{CafeField, CafeForm, LoginField, LoginForm};
use crate::ui::helpers::{fill, position_cursor, truncate, width};
use crate::ui::theme::Theme;

const LABEL_WIDTH: usize = 16;

/// One `Label: value` row; the focused row gets the input border color and a
/// cursor block.
fn field_row(row: usize, label: &str, value: &str, focused: bool, theme: &Theme, cols: usize) -> usize {
    let marker = if focused { "›" } else { " " };
    let label_color = if focused {
        &theme.colors.input_border
    } else {
        &theme.colors.text_dim
    };
    let cursor = if focused { "█" } else { "" };
    let value = truncate(value, cols.saturating_sub(LABEL_WIDTH + 4));

    position_cursor(row, 1);
    print!("{}", Theme::fg(label_color));
    print!("{marker} {:<LABEL_WIDTH$}", format!("{label}:"));
    print!("{}{value}{cursor}", Theme::fg(&theme.colors.text_normal));
    fill(2 + LABEL_WIDTH + width(&value) + width(cursor), cols);
    print!("{}", Theme::reset());
    row + 1
}

pub fn render_login_form(row: usize, form: &LoginForm, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    current_row = field_row(
        current_row,
        "Username",
        &form.username,
        form.focus == LoginField::Username,
        theme,
        cols,
    );
    field_row(
        current_row,
        "Password",
        &form.masked_password(),
        form.focus == LoginField::Password,
        theme,
        cols,
    )
}

/// Renders the cafe form. `categories` drives the "also good for" checklist and
/// `also_cursor` marks the entry Space toggles.
#[allow(clippy::too_many_arguments)]
pub fn render_cafe_form(
    row: usize,
    heading: &str,
    form: &CafeForm,
    focus: CafeField,
    categories: &[String],
    also_cursor: usize,
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    let heading = truncate(heading, cols.saturating_sub(1));
    print!(" {heading}");
    fill(width(&heading) + 1, cols);
    print!("{}", Theme::reset());

    let mut current_row = row + 1;
    for field in CafeField::ALL {
        let focused = field == focus;
        current_row = match field {
            CafeField::BestFor => {
                let value = if form.best_for.is_empty() {
                    "(choose)"
                } else {
                    form.best_for.as_str()
                };
                let value = if focused {
                    format!("◂ {value} ▸")
                } else {
                    value.to_string()
                };
                field_row(current_row, field.label(), &value, focused, theme, cols)
            }
            CafeField::AlsoGoodFor => {
                let value = categories
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let mark = if form.also_good_for.contains(name) { "x" } else { " " };
                        if focused && i == also_cursor {
                            format!("»[{mark}] {name}«")
                        } else {
                            format!("[{mark}] {name}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                field_row(current_row, field.label(), &value, focused, theme, cols)
            }
            _ => {
                let value = form.text(field).unwrap_or_default();
                field_row(current_row, field.label(), value, focused, theme, cols)
            }
        };
    }
    current_row
}
