//! Filter engine.
//!
//! Pure mapping from `(cafes, criteria)` to the order-preserving subsequence of
//! cafes that pass three independent predicates joined by AND. An empty value in
//! any dimension means "no constraint", never "match nothing".

use crate::domain::cafe::Cafe;
use crate::domain::normalize::normalize;

/// Filter input derived from the listing controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Substring of the city.
    pub city: String,
    /// Substring of the primary category or of any secondary category.
    pub best_for: String,
    /// Exact secondary categories; at least one must be present.
    pub also_good_for: Vec<String>,
}

/// Criteria with every term normalized once up front.
struct Normalized {
    city: String,
    best_for: String,
    also_good_for: Vec<String>,
}

impl From<&FilterCriteria> for Normalized {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            city: normalize(&criteria.city),
            best_for: normalize(&criteria.best_for),
            also_good_for: criteria
                .also_good_for
                .iter()
                .map(|c| normalize(c))
                .collect(),
        }
    }
}

impl Normalized {
    fn city_matches(&self, cafe: &Cafe) -> bool {
        self.city.is_empty() || cafe.normalized_city().contains(&self.city)
    }

    fn best_for_matches(&self, cafe: &Cafe) -> bool {
        if self.best_for.is_empty() {
            return true;
        }
        cafe.normalized_best_for().contains(&self.best_for)
            || cafe
                .normalized_also_good_for()
                .iter()
                .any(|c| c.contains(&self.best_for))
    }

    fn also_good_for_matches(&self, cafe: &Cafe) -> bool {
        if self.also_good_for.is_empty() {
            return true;
        }
        let tags = cafe.normalized_also_good_for();
        self.also_good_for.iter().any(|wanted| tags.contains(wanted))
    }

    fn matches(&self, cafe: &Cafe) -> bool {
        self.city_matches(cafe) && self.best_for_matches(cafe) && self.also_good_for_matches(cafe)
    }
}

impl FilterCriteria {
    /// Whether a single cafe passes all three predicates.
    #[must_use]
    pub fn matches(&self, cafe: &Cafe) -> bool {
        Normalized::from(self).matches(cafe)
    }
}

/// Returns the cafes passing `criteria`, in their original order.
#[must_use]
pub fn filter<'a>(cafes: &'a [Cafe], criteria: &FilterCriteria) -> Vec<&'a Cafe> {
    let normalized = Normalized::from(criteria);
    let result: Vec<&Cafe> = cafes.iter().filter(|c| normalized.matches(c)).collect();
    tracing::trace!(total = cafes.len(), kept = result.len(), "filter applied");
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn cafe(id: i64, city: &str, best: &str, also: &[&str]) -> Cafe {
        Cafe {
            id,
            title: format!("Cafe {id}"),
            city: city.to_string(),
            description: String::new(),
            image_url: None,
            best_for: best.to_string(),
            also_good_for: also.iter().map(ToString::to_string).collect(),
            average_rating: 0.0,
        }
    }

    fn ids(cafes: &[&Cafe]) -> Vec<i64> {
        cafes.iter().map(|c| c.id).collect()
    }

    fn sample() -> Vec<Cafe> {
        vec![
            cafe(1, "Paris", "Coffee", &["WiFi", "Quiet"]),
            cafe(2, "New York", "Brunch", &["Coffee Beans"]),
            cafe(3, "paris  nord", "Tea", &[]),
            cafe(4, "Berlin", "N/A", &["quiet"]),
        ]
    }

    #[test]
    fn empty_criteria_keep_everything_in_order() {
        let cafes = sample();
        assert_eq!(ids(&filter(&cafes, &FilterCriteria::default())), vec![1, 2, 3, 4]);

        let blank = FilterCriteria {
            city: "   ".into(),
            best_for: "\t".into(),
            also_good_for: vec![],
        };
        assert_eq!(ids(&filter(&cafes, &blank)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn city_is_a_normalized_substring() {
        let cafes = sample();
        for query in ["paris", "  PARIS ", "Par"] {
            let criteria = FilterCriteria {
                city: query.into(),
                ..FilterCriteria::default()
            };
            let found = filter(&cafes, &criteria);
            assert_eq!(ids(&found), vec![1, 3]);
            assert!(found.iter().all(|c| c.city.to_lowercase().contains("par")));
        }

        let criteria = FilterCriteria {
            city: "new   york".into(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter(&cafes, &criteria)), vec![2]);
    }

    #[test]
    fn best_for_matches_primary_or_secondary_substring() {
        let cafes = sample();
        let criteria = FilterCriteria {
            best_for: "coffee".into(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter(&cafes, &criteria)), vec![1, 2]);
    }

    #[test]
    fn also_good_for_needs_exact_membership() {
        let cafes = vec![cafe(1, "x", "y", &["wifi", "quiet"])];
        let quiet = FilterCriteria {
            also_good_for: vec!["quiet".into()],
            ..FilterCriteria::default()
        };
        assert_eq!(filter(&cafes, &quiet).len(), 1);

        let loud = FilterCriteria {
            also_good_for: vec!["loud".into()],
            ..FilterCriteria::default()
        };
        assert!(filter(&cafes, &loud).is_empty());

        let partial = FilterCriteria {
            also_good_for: vec!["qui".into()],
            ..FilterCriteria::default()
        };
        assert!(filter(&cafes, &partial).is_empty());
    }

    #[test]
    fn also_good_for_is_case_insensitive_and_any_of() {
        let cafes = sample();
        let criteria = FilterCriteria {
            also_good_for: vec!["QUIET".into(), "Nope".into()],
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter(&cafes, &criteria)), vec![1, 4]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let cafes = sample();
        let criteria = FilterCriteria {
            city: "paris".into(),
            best_for: "tea".into(),
            also_good_for: vec![],
        };
        assert_eq!(ids(&filter(&cafes, &criteria)), vec![3]);
        assert!(criteria.matches(&cafes[2]));
        assert!(!criteria.matches(&cafes[0]));
    }
}
