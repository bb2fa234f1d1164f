//! Filtering and full-text search.
//!
//! Both operations are pure: they clone matching records out in input
//! order and never touch shared state, so concurrent readers are safe.
//! Malformed filter keys (saved views referencing removed fields) are
//! treated as non-matching rather than erroring.

use rackview_model::{FieldKey, Filter, FilterKey, Server};

/// Apply conjunctive filters, then full-text search, to a record set.
///
/// A record survives iff it passes *every* filter (case-insensitive
/// substring against the named field; `all` always passes; unknown
/// fields never pass) and, when `search` is non-empty, *some* field
/// contains the search text. Relative input order is preserved; no
/// sorting happens here.
pub fn apply_filters_and_search(records: &[Server], filters: &[Filter], search: &str) -> Vec<Server> {
    // Lowercase the needles once, not per record.
    let filter_needles: Vec<String> = filters
        .iter()
        .map(|filter| filter.value.to_lowercase())
        .collect();
    let search_needle = search.to_lowercase();

    records
        .iter()
        .filter(|server| matches_filters(server, filters, &filter_needles))
        .filter(|server| search_needle.is_empty() || matches_search(server, &search_needle))
        .cloned()
        .collect()
}

fn matches_filters(server: &Server, filters: &[Filter], needles: &[String]) -> bool {
    filters.iter().zip(needles).all(|(filter, needle)| {
        match &filter.key {
            FilterKey::All => true,
            FilterKey::Field(key) => key.value(server).contains_ignore_case(needle),
            // Field no longer exists: nothing can match it.
            FilterKey::Unknown(_) => false,
        }
    })
}

fn matches_search(server: &Server, needle: &str) -> bool {
    FieldKey::ALL
        .iter()
        .any(|key| key.value(server).contains_ignore_case(needle))
}
