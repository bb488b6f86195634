//! Predicate filtering: free-text search, categorical dimensions and
//! relative-date buckets.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::value::Listable;

/// A named relative-date predicate evaluated against each record's
/// reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeBucket {
    Today,
    ThisWeek,
    ThisMonth,
    Overdue,
}

impl TimeBucket {
    /// Whether the record falls in this bucket relative to `today`.
    /// A record with no reference date is in no bucket at all.
    pub fn contains<T: Listable>(self, record: &T, today: NaiveDate) -> bool {
        let Some(date) = record.reference_date() else {
            return false;
        };
        match self {
            TimeBucket::Today => date == today,
            // IsoWeek equality carries the ISO year, so weeks that
            // straddle Dec 31 still match.
            TimeBucket::ThisWeek => date.iso_week() == today.iso_week(),
            TimeBucket::ThisMonth => {
                date.year() == today.year() && date.month() == today.month()
            }
            // Completed and resolved records are never overdue.
            TimeBucket::Overdue => date < today && !record.is_terminal(),
        }
    }
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeBucket::Today => write!(f, "today"),
            TimeBucket::ThisWeek => write!(f, "week"),
            TimeBucket::ThisMonth => write!(f, "month"),
            TimeBucket::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for TimeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "today" => Ok(TimeBucket::Today),
            "week" | "this_week" => Ok(TimeBucket::ThisWeek),
            "month" | "this_month" => Ok(TimeBucket::ThisMonth),
            "overdue" => Ok(TimeBucket::Overdue),
            _ => Err(format!("Invalid time bucket: {}", s)),
        }
    }
}

/// The combined filter state for one list view.
///
/// An empty accepted-value set for a dimension means "no constraint",
/// never "matches nothing". Dimensions combine with AND; values inside
/// one dimension (and selected time buckets) combine with OR.
#[derive(Debug, Default, Clone)]
pub struct FilterSet {
    /// Case-insensitive substring matched against the record type's
    /// configured search fields.
    pub search: String,
    /// Field key to accepted values, stored lowercased.
    pub dimensions: BTreeMap<String, BTreeSet<String>>,
    /// Selected time buckets, OR-combined.
    pub buckets: BTreeSet<TimeBucket>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the filter has any constraints at all.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.dimensions.values().all(BTreeSet::is_empty)
            && self.buckets.is_empty()
    }

    /// Add one accepted value to a dimension.
    pub fn accept(&mut self, dimension: &str, value: &str) {
        self.dimensions
            .entry(dimension.to_string())
            .or_default()
            .insert(value.to_lowercase());
    }

    /// Record passes iff it satisfies the search predicate AND every
    /// non-empty dimension AND (when any are selected) some time bucket.
    pub fn matches<T: Listable>(&self, record: &T, today: NaiveDate) -> bool {
        self.matches_search(record)
            && self.matches_dimensions(record)
            && self.matches_buckets(record, today)
    }

    fn matches_search<T: Listable>(&self, record: &T) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        T::SEARCH_FIELDS.iter().any(|key| {
            record
                .field(key)
                .as_text()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
    }

    fn matches_dimensions<T: Listable>(&self, record: &T) -> bool {
        self.dimensions.iter().all(|(key, accepted)| {
            if accepted.is_empty() {
                return true;
            }
            record
                .field(key)
                .as_text()
                .is_some_and(|value| accepted.contains(&value.to_lowercase()))
        })
    }

    fn matches_buckets<T: Listable>(&self, record: &T, today: NaiveDate) -> bool {
        if self.buckets.is_empty() {
            return true;
        }
        self.buckets.iter().any(|b| b.contains(record, today))
    }
}

/// Apply the filter to a snapshot, producing a new sequence.
pub fn filter<T: Listable + Clone>(
    records: &[T],
    filters: &FilterSet,
    today: NaiveDate,
) -> Vec<T> {
    records
        .iter()
        .filter(|r| filters.matches(*r, today))
        .cloned()
        .collect()
}
