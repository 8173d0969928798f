//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML documents with a name and a flat color table. Two themes are
//! compiled in; custom ones are loaded from a file path given in the plugin
//! configuration.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme (default)
//! - `catppuccin-latte`: Light theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cba6f7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! input_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! success_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! chip_fg = "#1e1e2e"
//! chip_bg = "#89b4fa"
//! rating_fg = "#f9e2af"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{ConsoleError, Result};

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex color strings (e.g. "#cdd6f4") for every UI element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, labels and other secondary text.
    pub text_dim: String,

    pub border: String,
    /// Border of the focused input (city filter, form fields).
    pub input_border: String,

    /// City filter match highlight.
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Transient message tones.
    pub success_fg: String,
    pub error_fg: String,

    /// Selected "also good for" chips.
    pub chip_fg: String,
    pub chip_bg: String,

    pub rating_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name. Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Theme`] if the file cannot be read or does not
    /// parse as a theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ConsoleError::Theme(format!("Failed to read theme file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| ConsoleError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Picks the theme for a configuration: a theme file wins over a name, and
    /// an unknown name falls back to the default.
    ///
    /// # Errors
    ///
    /// Propagates [`Theme::from_file`] errors.
    pub fn resolve(name: Option<&str>, file: Option<&Path>) -> Result<Self> {
        if let Some(file) = file {
            return Self::from_file(file);
        }
        Ok(name.and_then(Self::from_name).unwrap_or_default())
    }

    /// Returns `(255, 255, 255)` for anything that is not six hex digits.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground escape, `\x1b[38;2;r;g;bm`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape, `\x1b[48;2;r;g;bm`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse, which the tests rule out.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).expect("Built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_themes_parse() {
        for name in ["catppuccin-mocha", "catppuccin-latte"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(Theme::fg("#1e1e2e"), "\u{1b}[38;2;30;30;46m");
        assert_eq!(Theme::bg("ff0000"), "\u{1b}[48;2;255;0;0m");
        assert_eq!(Theme::fg("bogus"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn test_resolve_prefers_file_and_falls_back_to_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let latte = include_str!("../../themes/catppuccin-latte.toml").replace(
            "name = \"catppuccin-latte\"",
            "name = \"custom\"",
        );
        file.write_all(latte.as_bytes()).unwrap();

        let theme = Theme::resolve(Some("catppuccin-latte"), Some(file.path())).unwrap();
        assert_eq!(theme.name, "custom");

        let theme = Theme::resolve(Some("unknown"), None).unwrap();
        assert_eq!(theme.name, DEFAULT_THEME);
    }

    #[test]
    fn test_invalid_file_is_theme_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name = 3").unwrap();

        let err = Theme::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConsoleError::Theme(_)));
        assert!(Theme::from_file("/nonexistent/theme.toml").is_err());
    }
}
