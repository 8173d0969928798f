//! Case- and whitespace-insensitive string normalization.
//!
//! Every comparison between user input and cafe data goes through [`normalize`],
//! so `"  Paris "` and `"paris"` are treated as the same city.

/// Trims, lowercases and collapses internal whitespace runs to a single space.
///
/// # Examples
///
/// ```
/// use cafe_console::domain::normalize;
///
/// assert_eq!(normalize("  Foo   Bar "), "foo bar");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for word in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Like [`normalize`], treating an absent value as the empty string.
#[must_use]
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}
