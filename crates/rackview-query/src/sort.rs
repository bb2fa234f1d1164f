//! Stable multi-key sorting.

use rackview_model::{FieldKey, MAX_SORT_KEYS, SortDirection, SortKey, Server};
use std::cmp::Ordering;

/// Sorting behavior knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Compare numeric columns (cores, RAM, storage, alarms) by value
    /// instead of by their string rendering.
    ///
    /// Off by default: the dashboard has always compared every column
    /// as text, so `"10"` sorts before `"2"`. Flip this on to get
    /// numeric ordering on those columns.
    pub numeric_aware: bool,
}

impl SortOptions {
    pub fn numeric_aware() -> Self {
        Self { numeric_aware: true }
    }
}

/// Stable multi-key sort of a record set.
///
/// An empty key list is the identity: the input comes back in the same
/// order with the same elements. Otherwise records compare by the first
/// key, ties break by the second, and so on; each key's direction flips
/// only its own comparison, never the overall stability. The input is
/// never mutated.
pub fn apply_sort(records: &[Server], sort_keys: &[SortKey], options: SortOptions) -> Vec<Server> {
    let mut sorted = records.to_vec();
    if sort_keys.is_empty() {
        return sorted;
    }
    sorted.sort_by(|a, b| compare_records(a, b, sort_keys, options));
    sorted
}

fn compare_records(a: &Server, b: &Server, sort_keys: &[SortKey], options: SortOptions) -> Ordering {
    for sort in sort_keys {
        let ordering = compare_by_key(a, b, sort.key, options);
        if ordering != Ordering::Equal {
            return match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
        }
    }
    Ordering::Equal
}

fn compare_by_key(a: &Server, b: &Server, key: FieldKey, options: SortOptions) -> Ordering {
    if options.numeric_aware {
        if let (Some(x), Some(y)) = (key.numeric_value(a), key.numeric_value(b)) {
            return x.cmp(&y);
        }
    }
    compare_text(&key.value(a).into_text(), &key.value(b).into_text())
}

/// Case-insensitive text ordering with a raw tie-break.
///
/// Approximates the collation the dashboard's locale comparison gave:
/// `"alpha" < "Beta"` rather than all uppercase sorting first.
fn compare_text(a: &str, b: &str) -> Ordering {
    match a.to_lowercase().cmp(&b.to_lowercase()) {
        Ordering::Equal => a.cmp(b),
        ordering => ordering,
    }
}

/// Fold a header click into the active sort order.
///
/// A column not yet sorted becomes the new primary key (ascending) and
/// the oldest key falls off past [`MAX_SORT_KEYS`]. Clicking an
/// ascending column flips it to descending in place; clicking a
/// descending column removes it.
pub fn toggle_sort_key(sort_keys: &[SortKey], key: FieldKey) -> Vec<SortKey> {
    let mut next: Vec<SortKey> = sort_keys.to_vec();
    match next.iter().position(|sort| sort.key == key) {
        Some(index) => match next[index].direction {
            SortDirection::Asc => next[index].direction = SortDirection::Desc,
            SortDirection::Desc => {
                next.remove(index);
            }
        },
        None => {
            next.insert(0, SortKey::asc(key));
            next.truncate(MAX_SORT_KEYS);
        }
    }
    next
}
