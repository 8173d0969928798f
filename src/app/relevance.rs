//! Relevance sorter.
//!
//! Moves cafes whose primary category matches the best-for term ahead of cafes
//! that only matched through a secondary category. The partition is stable.

use crate::domain::cafe::Cafe;
use crate::domain::normalize::normalize;

/// Stable partition on "primary category contains `term`".
///
/// A term that normalizes to empty returns the input untouched.
#[must_use]
pub fn sort_by_relevance<'a>(cafes: Vec<&'a Cafe>, term: &str) -> Vec<&'a Cafe> {
    let term = normalize(term);
    if term.is_empty() {
        return cafes;
    }

    let (mut direct, indirect): (Vec<&Cafe>, Vec<&Cafe>) = cafes
        .into_iter()
        .partition(|cafe| cafe.normalized_best_for().contains(&term));

    tracing::trace!(direct = direct.len(), indirect = indirect.len(), "relevance partition");
    direct.extend(indirect);
    direct
}
