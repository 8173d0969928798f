//! Admin input forms and their client-side validation.
//!
//! Validation runs before any write request is built: text fields are trimmed,
//! an empty image URL becomes `null`, the four required fields must be present,
//! and every category must be one the backend knows about.

use crate::domain::cafe::{Cafe, CafePayload, Category, NO_CATEGORY};
use crate::domain::error::{ConsoleError, Result};

/// Editable fields of [`CafeForm`], in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CafeField {
    Title,
    City,
    Description,
    ImageUrl,
    BestFor,
    AlsoGoodFor,
}

impl CafeField {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::City,
        Self::Description,
        Self::ImageUrl,
        Self::BestFor,
        Self::AlsoGoodFor,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::City => "City",
            Self::Description => "Description",
            Self::ImageUrl => "Image URL",
            Self::BestFor => "Best for",
            Self::AlsoGoodFor => "Also good for",
        }
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        !matches!(self, Self::BestFor | Self::AlsoGoodFor)
    }

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Raw, unvalidated contents of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CafeForm {
    pub title: String,
    pub city: String,
    pub description: String,
    pub image_url: String,
    pub best_for: String,
    pub also_good_for: Vec<String>,
}

impl CafeForm {
    /// Pre-fills the form from a loaded cafe.
    #[must_use]
    pub fn from_cafe(cafe: &Cafe) -> Self {
        Self {
            title: cafe.title.clone(),
            city: cafe.city.clone(),
            description: cafe.description.clone(),
            image_url: cafe.image_url.clone().unwrap_or_default(),
            best_for: if cafe.best_for == NO_CATEGORY {
                String::new()
            } else {
                cafe.best_for.clone()
            },
            also_good_for: cafe.also_good_for.clone(),
        }
    }

    /// Mutable access to a text field; `None` for the category pickers.
    pub fn text_mut(&mut self, field: CafeField) -> Option<&mut String> {
        match field {
            CafeField::Title => Some(&mut self.title),
            CafeField::City => Some(&mut self.city),
            CafeField::Description => Some(&mut self.description),
            CafeField::ImageUrl => Some(&mut self.image_url),
            CafeField::BestFor | CafeField::AlsoGoodFor => None,
        }
    }

    #[must_use]
    pub fn text(&self, field: CafeField) -> Option<&str> {
        match field {
            CafeField::Title => Some(&self.title),
            CafeField::City => Some(&self.city),
            CafeField::Description => Some(&self.description),
            CafeField::ImageUrl => Some(&self.image_url),
            CafeField::BestFor | CafeField::AlsoGoodFor => None,
        }
    }

    /// Steps the primary category through `categories`, with an empty
    /// "unselected" position before the first entry.
    pub fn cycle_best_for(&mut self, categories: &[Category], forward: bool) {
        if categories.is_empty() {
            return;
        }
        let current = categories.iter().position(|c| c.name == self.best_for);
        let slots = categories.len() + 1;
        let pos = current.map_or(0, |i| i + 1);
        let next = if forward {
            (pos + 1) % slots
        } else {
            (pos + slots - 1) % slots
        };
        self.best_for = if next == 0 {
            String::new()
        } else {
            categories[next - 1].name.clone()
        };
    }

    /// Adds `name` to the secondary categories, or removes it if present.
    pub fn toggle_also_good_for(&mut self, name: &str) {
        if let Some(idx) = self.also_good_for.iter().position(|c| c == name) {
            self.also_good_for.remove(idx);
        } else {
            self.also_good_for.push(name.to_string());
        }
    }

    /// Validates the form against the known categories.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] naming the first problem found:
    /// - `"All required fields must be filled"`
    /// - `"Invalid best_for: X"`
    /// - `"Invalid also_good_for: a, b"`
    pub fn validate(&self, categories: &[Category]) -> Result<CafePayload> {
        let title = self.title.trim();
        let city = self.city.trim();
        let description = self.description.trim();
        let best_for = self.best_for.trim();
        let image_url = self.image_url.trim();

        if title.is_empty() || city.is_empty() || description.is_empty() || best_for.is_empty() {
            return Err(ConsoleError::Validation(
                "All required fields must be filled".to_string(),
            ));
        }

        let known = |name: &str| categories.iter().any(|c| c.name == name);

        if !known(best_for) {
            return Err(ConsoleError::Validation(format!("Invalid best_for: {best_for}")));
        }

        let also_good_for: Vec<String> = self
            .also_good_for
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let unknown: Vec<&str> = also_good_for
            .iter()
            .map(String::as_str)
            .filter(|&c| !known(c))
            .collect();
        if !unknown.is_empty() {
            return Err(ConsoleError::Validation(format!(
                "Invalid also_good_for: {}",
                unknown.join(", ")
            )));
        }

        Ok(CafePayload {
            title: title.to_string(),
            city: city.to_string(),
            description: description.to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
            best_for: best_for.to_string(),
            also_good_for,
        })
    }
}

/// Which login input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Password rendered as one `*` per character.
    #[must_use]
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![Category::new("WiFi"), Category::new("Quiet")]
    }

    fn filled() -> CafeForm {
        CafeForm {
            title: "  Bean  ".into(),
            city: " Paris".into(),
            description: "Nice ".into(),
            image_url: "   ".into(),
            best_for: "WiFi".into(),
            also_good_for: vec!["Quiet".into()],
        }
    }

    #[test]
    fn valid_form_trims_and_nulls_empty_image() {
        let payload = filled().validate(&categories()).unwrap();
        assert_eq!(payload.title, "Bean");
        assert_eq!(payload.city, "Paris");
        assert_eq!(payload.description, "Nice");
        assert_eq!(payload.image_url, None);
        assert_eq!(payload.also_good_for, vec!["Quiet"]);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        for blank in [CafeField::Title, CafeField::City, CafeField::Description] {
            let mut form = filled();
            if let Some(text) = form.text_mut(blank) {
                *text = "  ".into();
            }
            let err = form.validate(&categories()).unwrap_err();
            assert_eq!(err.to_string(), "All required fields must be filled");
        }

        let mut form = filled();
        form.best_for.clear();
        assert_eq!(
            form.validate(&categories()).unwrap_err().to_string(),
            "All required fields must be filled"
        );
    }

    #[test]
    fn unknown_categories_are_named() {
        let mut form = filled();
        form.best_for = "Dogs".into();
        assert_eq!(
            form.validate(&categories()).unwrap_err().to_string(),
            "Invalid best_for: Dogs"
        );

        let mut form = filled();
        form.also_good_for = vec!["Quiet".into(), "Loud".into(), "Cats".into()];
        assert_eq!(
            form.validate(&categories()).unwrap_err().to_string(),
            "Invalid also_good_for: Loud, Cats"
        );
    }

    #[test]
    fn best_for_cycles_through_unselected() {
        let cats = categories();
        let mut form = CafeForm::default();
        form.cycle_best_for(&cats, true);
        assert_eq!(form.best_for, "WiFi");
        form.cycle_best_for(&cats, true);
        assert_eq!(form.best_for, "Quiet");
        form.cycle_best_for(&cats, true);
        assert_eq!(form.best_for, "");
        form.cycle_best_for(&cats, false);
        assert_eq!(form.best_for, "Quiet");
    }

    #[test]
    fn toggling_adds_then_removes() {
        let mut form = CafeForm::default();
        form.toggle_also_good_for("Quiet");
        form.toggle_also_good_for("WiFi");
        assert_eq!(form.also_good_for, vec!["Quiet", "WiFi"]);
        form.toggle_also_good_for("Quiet");
        assert_eq!(form.also_good_for, vec!["WiFi"]);
    }

    #[test]
    fn field_focus_wraps() {
        assert_eq!(CafeField::AlsoGoodFor.next(), CafeField::Title);
        assert_eq!(CafeField::Title.previous(), CafeField::AlsoGoodFor);
    }
}
