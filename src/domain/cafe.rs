//! Cafe and category domain model.
//!
//! [`Cafe`] is an immutable value built from a [`CafeRecord`] as returned by the
//! backend. The record type is deliberately loose (the backend serializes
//! categories either as bare names or as `{id, name}` objects, and several fields
//! may be `null`); conversion into [`Cafe`] applies the defaults and rejects
//! records without a usable identity.

use crate::domain::error::{ConsoleError, Result};
use crate::domain::normalize::normalize;
use serde::{Deserialize, Serialize};

/// Sentinel stored in [`Cafe::best_for`] when the backend has no category.
pub const NO_CATEGORY: &str = "N/A";

/// Image shown for cafes without an `image_url`.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x220?text=No+Image";

/// A named tag usable as "best for" or "also good for".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A category reference inside a cafe record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Object { name: String },
}

impl CategoryRef {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Object { name } => name,
        }
    }
}

/// Raw cafe record as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CafeRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub best_for: Option<CategoryRef>,
    #[serde(default)]
    pub also_good_for: Option<Vec<CategoryRef>>,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

/// Identity used by the backend to address update and delete targets.
///
/// The backend has no id-based write endpoints, so a cafe is located by its
/// `(title, city)` pair as it was last loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CafeKey {
    pub title: String,
    pub city: String,
}

/// One cafe's display data.
#[derive(Debug, Clone, PartialEq)]
pub struct Cafe {
    pub id: i64,
    pub title: String,
    pub city: String,
    pub description: String,
    pub image_url: Option<String>,
    pub best_for: String,
    pub also_good_for: Vec<String>,
    pub average_rating: f64,
}

impl TryFrom<CafeRecord> for Cafe {
    type Error = ConsoleError;

    fn try_from(record: CafeRecord) -> Result<Self> {
        let id = record.id.as_ref().and_then(serde_json::Value::as_i64);
        let title = record
            .title
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty());

        let (Some(id), Some(title)) = (id, title) else {
            tracing::debug!(id = ?record.id, title = ?record.title, "rejecting cafe record");
            return Err(ConsoleError::InvalidRecord("Invalid Cafe data".to_string()));
        };

        let best_for = record
            .best_for
            .map(CategoryRef::into_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NO_CATEGORY.to_string());

        Ok(Self {
            id,
            title: title.to_string(),
            city: record.city.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            image_url: record.image_url.filter(|u| !u.is_empty()),
            best_for,
            also_good_for: record
                .also_good_for
                .unwrap_or_default()
                .into_iter()
                .map(CategoryRef::into_name)
                .collect(),
            average_rating: record.average_rating.unwrap_or(0.0),
        })
    }
}

impl Cafe {
    #[must_use]
    pub fn key(&self) -> CafeKey {
        CafeKey {
            title: self.title.clone(),
            city: self.city.clone(),
        }
    }

    #[must_use]
    pub fn normalized_city(&self) -> String {
        normalize(&self.city)
    }

    #[must_use]
    pub fn normalized_best_for(&self) -> String {
        normalize(&self.best_for)
    }

    #[must_use]
    pub fn normalized_also_good_for(&self) -> Vec<String> {
        self.also_good_for.iter().map(|c| normalize(c)).collect()
    }

    /// Comma-separated secondary categories, or `"None"`.
    #[must_use]
    pub fn formatted_also_good_for(&self) -> String {
        if self.also_good_for.is_empty() {
            "None".to_string()
        } else {
            self.also_good_for.join(", ")
        }
    }

    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Five-star rendering of the average rating, e.g. `★★★★☆ (4.5)`.
    #[must_use]
    pub fn rating_line(&self) -> String {
        let rating = self.average_rating.clamp(0.0, 5.0);
        // rounded to the nearest whole star, always within 0..=5
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let filled = rating.round() as usize;
        format!(
            "{}{} ({rating:.1})",
            "★".repeat(filled),
            "☆".repeat(5 - filled)
        )
    }
}

/// Body of a create or update request. Has no id; the backend assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CafePayload {
    pub title: String,
    pub city: String,
    pub description: String,
    pub image_url: Option<String>,
    pub best_for: String,
    pub also_good_for: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> CafeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn applies_defaults_for_missing_fields() {
        let cafe = Cafe::try_from(record(json!({"id": 7, "title": "Bean There"}))).unwrap();

        assert_eq!(cafe.id, 7);
        assert_eq!(cafe.city, "");
        assert_eq!(cafe.description, "");
        assert_eq!(cafe.image_url, None);
        assert_eq!(cafe.best_for, NO_CATEGORY);
        assert!(cafe.also_good_for.is_empty());
        assert_eq!(cafe.formatted_also_good_for(), "None");
        assert_eq!(cafe.image_or_placeholder(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn accepts_category_objects_and_names() {
        let cafe = Cafe::try_from(record(json!({
            "id": 1,
            "title": "Grind",
            "city": "Paris",
            "best_for": {"id": 3, "name": "WiFi"},
            "also_good_for": [{"id": 4, "name": "Quiet"}, "Brunch"],
            "average_rating": 4.5
        })))
        .unwrap();

        assert_eq!(cafe.best_for, "WiFi");
        assert_eq!(cafe.also_good_for, vec!["Quiet", "Brunch"]);
        assert_eq!(cafe.formatted_also_good_for(), "Quiet, Brunch");
        assert_eq!(cafe.rating_line(), "★★★★★ (4.5)");
    }

    #[test]
    fn null_best_for_becomes_sentinel() {
        let cafe =
            Cafe::try_from(record(json!({"id": 2, "title": "X", "best_for": null}))).unwrap();
        assert_eq!(cafe.best_for, NO_CATEGORY);
    }

    #[test]
    fn rejects_records_without_identity() {
        for value in [
            json!({"title": "No id"}),
            json!({"id": "7", "title": "String id"}),
            json!({"id": 7}),
            json!({"id": 7, "title": 12}),
            json!({"id": 7, "title": ""}),
        ] {
            let err = Cafe::try_from(record(value)).unwrap_err();
            assert_eq!(err.to_string(), "Invalid Cafe data");
        }
    }

    #[test]
    fn payload_serializes_absent_image_as_null() {
        let payload = CafePayload {
            title: "A".into(),
            city: "B".into(),
            description: "C".into(),
            image_url: None,
            best_for: "WiFi".into(),
            also_good_for: vec!["Quiet".into()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["image_url"], serde_json::Value::Null);
        assert_eq!(value["also_good_for"], json!(["Quiet"]));
    }

    #[test]
    fn rating_line_rounds_to_whole_stars() {
        let mut cafe = Cafe::try_from(record(json!({"id": 1, "title": "T"}))).unwrap();
        assert_eq!(cafe.rating_line(), "☆☆☆☆☆ (0.0)");
        cafe.average_rating = 3.2;
        assert_eq!(cafe.rating_line(), "★★★☆☆ (3.2)");
    }
}
