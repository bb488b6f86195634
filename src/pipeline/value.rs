//! Field extraction and type-aware comparison for list records.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

/// A single field value extracted from a record for filtering or sorting.
///
/// Variants carry the comparison semantics of the underlying column:
/// dates compare by epoch, names and text case-insensitively, and a
/// missing value always sorts lowest.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent or unparseable value; sorts before everything else.
    Missing,
    /// Timestamp or calendar date.
    Date(DateTime<Utc>),
    /// Numeric column (costs, counts).
    Number(i64),
    /// Plain text, compared case-insensitively.
    Text(String),
    /// A resolved relation's display name (assignee, uploader), compared
    /// by that name rather than the underlying id.
    Name(String),
}

impl FieldValue {
    pub fn from_opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) => FieldValue::Text(s.to_string()),
            None => FieldValue::Missing,
        }
    }

    pub fn from_opt_date(value: Option<NaiveDate>) -> Self {
        match value {
            Some(d) => FieldValue::Date(d.and_time(chrono::NaiveTime::MIN).and_utc()),
            None => FieldValue::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Missing => 0,
            FieldValue::Date(_) => 1,
            FieldValue::Number(_) => 2,
            FieldValue::Text(_) | FieldValue::Name(_) => 3,
        }
    }

    /// Total order used by the sort stage.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Date(a), FieldValue::Date(b)) => {
                a.timestamp_millis().cmp(&b.timestamp_millis())
            }
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (
                FieldValue::Text(a) | FieldValue::Name(a),
                FieldValue::Text(b) | FieldValue::Name(b),
            ) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Render the value for a table cell.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Missing => "-".to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) | FieldValue::Name(s) => s.clone(),
        }
    }

    /// Text used by the search predicate and categorical matching.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Name(s) => Some(s),
            _ => None,
        }
    }
}

/// A record that can flow through the filter/sort/paginate pipeline.
pub trait Listable {
    /// Field keys probed by the free-text search predicate.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Extract one field by key. Unknown keys return `Missing`.
    fn field(&self, key: &str) -> FieldValue;

    /// The date the time-bucket filters are evaluated against
    /// (due date for tasks, expiry for subscriptions, creation otherwise).
    fn reference_date(&self) -> Option<NaiveDate>;

    /// Whether the record is in a terminal status (completed, resolved).
    /// Terminal records are never "overdue".
    fn is_terminal(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_sorts_lowest() {
        let date = FieldValue::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(FieldValue::Missing.compare(&date), Ordering::Less);
        assert_eq!(
            FieldValue::Missing.compare(&FieldValue::Text("a".into())),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Missing.compare(&FieldValue::Missing),
            Ordering::Equal
        );
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        let a = FieldValue::Text("alpha".into());
        let b = FieldValue::Text("ALPHA".into());
        assert_eq!(a.compare(&b), Ordering::Equal);

        let c = FieldValue::Text("Beta".into());
        assert_eq!(a.compare(&c), Ordering::Less);
    }

    #[test]
    fn test_name_and_text_share_ordering() {
        let name = FieldValue::Name("Carol".into());
        let text = FieldValue::Text("bob".into());
        assert_eq!(name.compare(&text), Ordering::Greater);
    }

    #[test]
    fn test_dates_compare_by_epoch() {
        let early = FieldValue::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let late = FieldValue::Date(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(early.compare(&late), Ordering::Less);
    }

    #[test]
    fn test_from_opt_date_none_is_missing() {
        assert_eq!(FieldValue::from_opt_date(None), FieldValue::Missing);
    }
}
