//! Stable, type-aware ordering of a filtered snapshot.

use std::str::FromStr;

use super::value::Listable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ascending => write!(f, "asc"),
            Direction::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

/// Return a new sequence ordered by the named field.
///
/// The sort is stable: records comparing equal keep their prior relative
/// order, so re-sorting an already-sorted sequence is a no-op. The input
/// is never mutated.
pub fn sorted<T: Listable + Clone>(records: &[T], field: &str, direction: Direction) -> Vec<T> {
    let mut out: Vec<T> = records.to_vec();
    out.sort_by(|a, b| {
        let ord = a.field(field).compare(&b.field(field));
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Task;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(title: &str) -> Task {
        Task::new(title.to_string())
    }

    #[test]
    fn test_sort_by_title_ascending() {
        let records = vec![task("beta"), task("Alpha"), task("gamma")];
        let out = sorted(&records, "title", Direction::Ascending);
        let titles: Vec<&str> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_sort_descending_by_created_at() {
        let mut a = task("a");
        a.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut b = task("b");
        b.created_at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let out = sorted(&[a, b], "created_at", Direction::Descending);
        assert_eq!(out[0].title, "b");
        assert_eq!(out[1].title, "a");
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        let mut a = task("Same");
        a.description = Some("first".to_string());
        let mut b = task("Same");
        b.description = Some("second".to_string());

        let out = sorted(&[a, b], "title", Direction::Ascending);
        assert_eq!(out[0].description.as_deref(), Some("first"));
        assert_eq!(out[1].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let records = vec![task("b"), task("a"), task("c")];
        let once = sorted(&records, "title", Direction::Ascending);
        let twice = sorted(&once, "title", Direction::Ascending);
        let titles_once: Vec<&str> = once.iter().map(|t| t.title.as_str()).collect();
        let titles_twice: Vec<&str> = twice.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles_once, titles_twice);
    }

    #[test]
    fn test_missing_due_date_sorts_first_ascending() {
        let mut with_date = task("dated");
        with_date.due_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        let without = task("undated");

        let out = sorted(&[with_date, without], "due_date", Direction::Ascending);
        assert_eq!(out[0].title, "undated");
        assert_eq!(out[1].title, "dated");
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let records = vec![task("b"), task("a")];
        let _ = sorted(&records, "title", Direction::Ascending);
        assert_eq!(records[0].title, "b");
    }

    #[test]
    fn test_sort_by_resolved_assignee_names() {
        let mut a = task("a");
        a.assignee_names = vec!["Zoe".to_string()];
        let mut b = task("b");
        b.assignee_names = vec!["adam".to_string()];

        let out = sorted(&[a, b], "assignees", Direction::Ascending);
        assert_eq!(out[0].title, "b");
    }
}
