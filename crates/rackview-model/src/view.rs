//! Filter, sort, and saved-view shapes.

use crate::field::FieldKey;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of simultaneously active sort keys.
pub const MAX_SORT_KEYS: usize = 3;

/// The column a filter applies to.
///
/// `All` is the pass-through marker the UI uses for its default state.
/// `Unknown` keeps saved views loadable after a field is removed from
/// the model: such a filter matches nothing instead of failing to
/// deserialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKey {
    /// No-op marker; every record passes.
    All,
    /// A live column.
    Field(FieldKey),
    /// A column name the current model no longer knows.
    Unknown(String),
}

impl FilterKey {
    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::All => "all",
            FilterKey::Field(key) => key.as_str(),
            FilterKey::Unknown(name) => name,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<FieldKey> for FilterKey {
    fn from(key: FieldKey) -> Self {
        FilterKey::Field(key)
    }
}

impl FromStr for FilterKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(FilterKey::All);
        }
        Ok(match FieldKey::from_str(s) {
            Ok(key) => FilterKey::Field(key),
            Err(_) => FilterKey::Unknown(s.to_string()),
        })
    }
}

impl Serialize for FilterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One conjunctive filter predicate: case-insensitive substring match
/// of `value` against the named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub key: FilterKey,
    pub value: String,
}

impl Filter {
    pub fn new(key: impl Into<FilterKey>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// One key of the multi-key sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub key: FieldKey,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(key: FieldKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: FieldKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

/// A named snapshot of the table configuration: filters, visible
/// columns, and sort order. Captures the UI setup, never the data.
/// Immutable once created, except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub filters: Vec<Filter>,
    pub visible_columns: Vec<FieldKey>,
    pub sort_order: Vec<SortKey>,
}

impl SavedView {
    /// Snapshot the given configuration under a fresh id.
    pub fn capture(
        name: impl Into<String>,
        owner_id: impl Into<String>,
        filters: &[Filter],
        visible_columns: &[FieldKey],
        sort_order: &[SortKey],
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            owner_id: owner_id.into(),
            filters: filters.to_vec(),
            visible_columns: visible_columns.to_vec(),
            sort_order: sort_order.to_vec(),
        }
    }
}
