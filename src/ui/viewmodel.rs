//! View model types representing renderable UI state.
//!
//! View models are plain data computed from an application state. They hold no
//! business logic, only display-ready strings, flags and highlight ranges, and
//! are rebuilt from scratch on every state notification.
//!
//! # Example
//!
//! ```rust
//! use cafe_console::api::ApiGateway;
//! use cafe_console::app::ListingState;
//! use cafe_console::ui::viewmodel::{ListingView, ResultsBody};
//!
//! let state = ListingState::new(ApiGateway::new("http://127.0.0.1:8000")?);
//! let view = ListingView::compute(&state, "");
//! assert_eq!(view.best_for_options[0].label, "All Categories");
//! assert!(matches!(view.body, ResultsBody::Empty(_)));
//! # Ok::<(), cafe_console::ConsoleError>(())
//! ```

use crate::app::admin::AdminState;
use crate::app::flash::{Flash, FlashSlot, Tone};
use crate::app::listing::ListingState;
use crate::domain::{normalize, Cafe};

/// Label of the best-for option that disables the filter.
pub const ALL_CATEGORIES: &str = "All Categories";

/// Body shown when no cafe passes the filters.
pub const NO_RESULTS: &str = "No cafes found matching your filters.";

/// Prompt of a pending delete confirmation.
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this cafe? (y/n)";

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    /// Value handed back to the state when chosen. Empty means "no filter".
    pub value: String,
    pub selected: bool,
}

/// A selected "also good for" value with its removal key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    /// 1-based position; pressing this digit removes the chip.
    pub index: usize,
    pub label: String,
}

/// Display information for a single cafe card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardItem {
    pub title: String,
    pub city: String,
    /// Character ranges of `city` matching the city filter, `(start, end)`.
    pub city_highlight: Vec<(usize, usize)>,
    pub description: String,
    pub image: String,
    pub best_for: String,
    /// Comma-joined list, or "None".
    pub also_good_for: String,
    pub rating: String,
}

impl CardItem {
    fn from_cafe(cafe: &Cafe, city_query: &str) -> Self {
        Self {
            title: cafe.title.clone(),
            city: cafe.city.clone(),
            city_highlight: match_ranges(&cafe.city, city_query),
            description: cafe.description.clone(),
            image: cafe.image_or_placeholder().to_string(),
            best_for: cafe.best_for.clone(),
            also_good_for: cafe.formatted_also_good_for(),
            rating: cafe.rating_line(),
        }
    }
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsBody {
    /// Initial load failed; carries the full line to display.
    Error(String),
    /// Cards in relevance order. Empty while loading.
    Cards(Vec<CardItem>),
    /// Nothing matched the filters.
    Empty(String),
}

/// Complete view model of the public listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    pub best_for_options: Vec<SelectOption>,
    pub also_good_for_options: Vec<SelectOption>,
    pub chips: Vec<Chip>,
    pub city_query: String,
    pub sidebar_visible: bool,
    pub loading_visible: bool,
    pub body: ResultsBody,
    /// "Found N cafes"; kept from the previous view in the error and loading branches.
    pub results_label: String,
}

impl ListingView {
    /// Recomputes the listing view from `state`.
    ///
    /// Filter controls, chips and the sidebar are always synced first. The body
    /// then follows the first matching branch: error, loading, results.
    #[must_use]
    pub fn compute(state: &ListingState, previous_label: &str) -> Self {
        let mut best_for_options = vec![SelectOption {
            label: ALL_CATEGORIES.to_string(),
            value: String::new(),
            selected: state.best_for().is_empty(),
        }];
        best_for_options.extend(state.categories().iter().map(|c| SelectOption {
            label: c.name.clone(),
            value: c.name.clone(),
            selected: c.name == state.best_for(),
        }));

        let also_good_for_options = state
            .categories()
            .iter()
            .map(|c| SelectOption {
                label: c.name.clone(),
                value: c.name.clone(),
                selected: state.also_good_for().contains(&c.name),
            })
            .collect();

        let chips = state
            .also_good_for()
            .iter()
            .enumerate()
            .map(|(i, label)| Chip {
                index: i + 1,
                label: label.clone(),
            })
            .collect();

        let mut view = Self {
            best_for_options,
            also_good_for_options,
            chips,
            city_query: state.city_query().to_string(),
            sidebar_visible: !state.city_query().trim().is_empty(),
            loading_visible: false,
            body: ResultsBody::Cards(Vec::new()),
            results_label: previous_label.to_string(),
        };

        if let Some(error) = state.error() {
            view.body = ResultsBody::Error(format!("Error: {error}"));
            return view;
        }

        if state.is_loading() {
            view.loading_visible = true;
            return view;
        }

        let filtered = state.filtered_cafes();
        view.results_label = format!("Found {} cafes", filtered.len());
        view.body = if filtered.is_empty() {
            ResultsBody::Empty(NO_RESULTS.to_string())
        } else {
            ResultsBody::Cards(
                filtered
                    .into_iter()
                    .map(|cafe| CardItem::from_cafe(cafe, state.city_query()))
                    .collect(),
            )
        };
        view
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        match &self.body {
            ResultsBody::Cards(cards) => cards.len(),
            _ => 0,
        }
    }
}

/// A transient message ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine {
    pub text: String,
    pub tone: Tone,
}

impl From<&Flash> for MessageLine {
    fn from(flash: &Flash) -> Self {
        Self {
            text: flash.text.clone(),
            tone: flash.tone,
        }
    }
}

/// One row of the admin cafe table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    pub id: i64,
    pub title: String,
    pub city: String,
    pub best_for: String,
    pub also_good_for: String,
}

/// Complete view model of the admin console.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminView {
    pub logged_in: bool,
    pub loading: bool,
    pub rows: Vec<AdminRow>,
    pub categories: Vec<String>,
    pub auth_message: Option<MessageLine>,
    pub message: Option<MessageLine>,
    /// Title of the cafe being edited.
    pub editing: Option<String>,
    pub confirm_delete: Option<String>,
    /// "Cafes (N)".
    pub count_label: String,
}

impl AdminView {
    #[must_use]
    pub fn compute(state: &AdminState) -> Self {
        let rows = state
            .cafes()
            .iter()
            .map(|cafe| AdminRow {
                id: cafe.id,
                title: cafe.title.clone(),
                city: cafe.city.clone(),
                best_for: cafe.best_for.clone(),
                also_good_for: cafe.formatted_also_good_for(),
            })
            .collect::<Vec<_>>();

        Self {
            logged_in: state.is_logged_in(),
            loading: state.is_loading(),
            count_label: format!("Cafes ({})", rows.len()),
            rows,
            categories: state.categories().iter().map(|c| c.name.clone()).collect(),
            auth_message: state.flash(FlashSlot::Auth).map(MessageLine::from),
            message: state.flash(FlashSlot::Main).map(MessageLine::from),
            editing: state.current_edit().map(|cafe| cafe.title.clone()),
            confirm_delete: state
                .pending_delete()
                .map(|cafe| format!("{CONFIRM_DELETE} [{}]", cafe.title)),
        }
    }
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Right-aligned status (results count, session state).
    pub status: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Character ranges of `text` that contain the normalized `query`.
///
/// The haystack is normalized the same way as the filter input, with each
/// normalized character remembering the span of `text` it came from, so
/// "New  York" still highlights for "new york".
fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = normalize(query).chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hay: Vec<(char, usize, usize)> = Vec::new();
    let mut gap: Option<usize> = None;
    for (i, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            if !hay.is_empty() {
                gap.get_or_insert(i);
            }
            continue;
        }
        if let Some(gap_start) = gap.take() {
            hay.push((' ', gap_start, i));
        }
        hay.extend(c.to_lowercase().map(|lower| (lower, i, i + 1)));
    }

    let mut ranges = Vec::new();
    let mut start = 0;
    while start + needle.len() <= hay.len() {
        let window = &hay[start..start + needle.len()];
        if window.iter().map(|&(c, ..)| c).eq(needle.iter().copied()) {
            ranges.push((window[0].1, window[window.len() - 1].2));
            start += needle.len();
        } else {
            start += 1;
        }
    }
    ranges
}
