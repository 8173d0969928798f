//! Application state for the public listing.
//!
//! [`ListingState`] holds the cafes, the categories, the three filter inputs and
//! the loading/error flags. It is mutated only through its own methods, and each
//! mutation ends with exactly one change notification.
//!
//! # Load cycle
//!
//! ```text
//! idle ──init()──▶ loading ──categories ok──▶ loading ──cafes ok──▶ ready
//!                     │                          │
//!                     └──────── any failure ─────┴──────────────▶ errored
//! ```
//!
//! `init()` may be called again from `ready` or `errored`. Because requests are
//! asynchronous, `init()` only issues the first request; the rest of the cycle
//! happens in [`ListingState::on_response`].

use crate::api::{ApiGateway, ApiReply, HttpResponse, Operation};
use crate::app::actions::Action;
use crate::app::filter::{filter, FilterCriteria};
use crate::app::notifier::Subscribers;
use crate::app::relevance::sort_by_relevance;
use crate::domain::cafe::{Cafe, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored,
}

#[derive(Debug)]
pub struct ListingState {
    gateway: ApiGateway,
    cafes: Vec<Cafe>,
    categories: Vec<Category>,
    city_query: String,
    best_for: String,
    also_good_for: Vec<String>,
    phase: LoadPhase,
    error: Option<String>,
    subscribers: Subscribers<Self>,
}

impl ListingState {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            cafes: Vec::new(),
            categories: Vec::new(),
            city_query: String::new(),
            best_for: String::new(),
            also_good_for: Vec::new(),
            phase: LoadPhase::Idle,
            error: None,
            subscribers: Subscribers::default(),
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Self) + 'static) -> usize {
        self.subscribers.subscribe(listener)
    }

    fn notify(&self) {
        self.subscribers.notify(self);
    }

    /// Starts a load cycle: enters loading, notifies, requests categories.
    pub fn init(&mut self) -> Vec<Action> {
        let _span = tracing::debug_span!("listing_init").entered();

        self.error = None;
        self.phase = LoadPhase::Loading;
        self.notify();

        vec![Action::Http(self.gateway.load_categories())]
    }

    /// Continues or finishes the load cycle with a completed request.
    pub fn on_response(&mut self, response: &HttpResponse) -> Vec<Action> {
        let _span = tracing::debug_span!("listing_on_response", operation = ?response.operation, status = response.status).entered();

        if self.phase != LoadPhase::Loading {
            tracing::debug!("ignoring response outside a load cycle");
            return vec![];
        }

        match (response.operation, ApiGateway::decode(response)) {
            (Some(Operation::LoadCategories), Ok(ApiReply::Categories(categories))) => {
                tracing::debug!(count = categories.len(), "categories loaded");
                self.categories = categories;
                vec![Action::Http(self.gateway.load_cafes(None))]
            }
            (Some(Operation::LoadCafes), Ok(ApiReply::Cafes(cafes))) => {
                tracing::debug!(count = cafes.len(), "cafes loaded");
                self.cafes = cafes;
                self.finish_loading();
                vec![]
            }
            (Some(Operation::LoadCategories | Operation::LoadCafes), Err(e)) => {
                tracing::debug!(error = %e, "initialization failed");
                self.error = Some(format!("Initialization error: {e}"));
                self.finish_loading();
                vec![]
            }
            (operation, _) => {
                tracing::debug!(operation = ?operation, "unexpected response for listing");
                vec![]
            }
        }
    }

    fn finish_loading(&mut self) {
        self.phase = if self.error.is_some() {
            LoadPhase::Errored
        } else {
            LoadPhase::Ready
        };
        self.notify();
    }

    pub fn set_city_query(&mut self, value: impl Into<String>) {
        self.city_query = value.into();
        tracing::debug!(city_query = %self.city_query, "city query set");
        self.notify();
    }

    pub fn set_best_for(&mut self, value: impl Into<String>) {
        self.best_for = value.into();
        tracing::debug!(best_for = %self.best_for, "best for set");
        self.notify();
    }

    pub fn set_also_good_for(&mut self, values: Vec<String>) {
        self.also_good_for = values;
        tracing::debug!(also_good_for = ?self.also_good_for, "also good for set");
        self.notify();
    }

    pub fn reset_filters(&mut self) {
        self.city_query.clear();
        self.best_for.clear();
        self.also_good_for.clear();
        tracing::debug!("filters reset");
        self.notify();
    }

    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            city: self.city_query.clone(),
            best_for: self.best_for.clone(),
            also_good_for: self.also_good_for.clone(),
        }
    }

    /// Cafes passing the current filters, direct category matches first.
    #[must_use]
    pub fn filtered_cafes(&self) -> Vec<&Cafe> {
        sort_by_relevance(filter(&self.cafes, &self.criteria()), &self.best_for)
    }

    #[must_use]
    pub fn cafes(&self) -> &[Cafe] {
        &self.cafes
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn city_query(&self) -> &str {
        &self.city_query
    }

    #[must_use]
    pub fn best_for(&self) -> &str {
        &self.best_for
    }

    #[must_use]
    pub fn also_good_for(&self) -> &[String] {
        &self.also_good_for
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
