//! Deterministic search/filter/sort pipeline
//!
//! Pure functions turning raw sentiment rows into the rows a page renders.
//! The composition order is fixed: search -> timeframe filter -> accuracy
//! sort -> watchlist view. Reordering the stages changes user-visible
//! ranking and is a behavior change, not a refactor.

pub mod paging;

use crate::types::{FilterState, SentimentRow, Timeframe};
use std::collections::HashSet;

/// Stage 1: rank rows against a free-text search term
///
/// An empty or whitespace-only term is the identity. Otherwise usernames are
/// matched case-insensitively and stable-partitioned: rows whose username
/// starts with the term come first, rows that merely contain it follow, and
/// within each group the original relative order is preserved. Rows matching
/// neither are dropped.
pub fn search_rank(rows: &[SentimentRow], term: &str) -> Vec<SentimentRow> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return rows.to_vec();
    }

    let mut starts_with = Vec::new();
    let mut contains = Vec::new();
    for row in rows {
        let username = row.username.to_lowercase();
        if username.starts_with(&term) {
            starts_with.push(row.clone());
        } else if username.contains(&term) {
            contains.push(row.clone());
        }
    }

    starts_with.extend(contains);
    starts_with
}

/// Stage 2: keep only rows whose timeframe is selected
///
/// An empty selection is the identity, not an empty result.
pub fn filter_timeframes(rows: Vec<SentimentRow>, selected: &HashSet<Timeframe>) -> Vec<SentimentRow> {
    if selected.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| selected.contains(&row.timeframe))
        .collect()
}

/// Stage 3: stable sort by accuracy descending when enabled
///
/// Ties keep the relative order the earlier stages produced.
pub fn sort_by_accuracy(mut rows: Vec<SentimentRow>, enabled: bool) -> Vec<SentimentRow> {
    if enabled {
        rows.sort_by(|a, b| b.accuracy.cmp(&a.accuracy));
    }
    rows
}

/// Stage 4: restrict to watchlisted usernames when the view is active
///
/// Applied last so toggling the view never changes what search/filter/sort
/// mean, only restricts their output.
pub fn watchlist_view(
    rows: Vec<SentimentRow>,
    view_active: bool,
    watched: &HashSet<String>,
) -> Vec<SentimentRow> {
    if !view_active {
        return rows;
    }
    rows.into_iter()
        .filter(|row| watched.contains(&row.username))
        .collect()
}

/// Full pipeline in the fixed composition order
pub fn apply(
    rows: &[SentimentRow],
    term: &str,
    filter: &FilterState,
    view_active: bool,
    watched: &HashSet<String>,
) -> Vec<SentimentRow> {
    let ranked = search_rank(rows, term);
    let filtered = filter_timeframes(ranked, &filter.selected_timeframes);
    let sorted = sort_by_accuracy(filtered, filter.sort_by_accuracy);
    watchlist_view(sorted, view_active, watched)
}
