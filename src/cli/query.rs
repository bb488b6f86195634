//! Filter-expression parsing for the `query` command.
//!
//! Expressions mix prefixed filter tokens with free search text:
//! - `status:open` - accept one status value (repeatable, OR-combined)
//! - `priority:high` - accept one priority value
//! - `category:billing` - accept one category value
//! - `department:sales` - accept one department value
//! - `due:overdue` - select a time bucket (today/week/month/overdue)
//!
//! Anything else becomes the free-text search term.

use crate::error::{OpsdeckError, Result};
use crate::pipeline::{FilterSet, TimeBucket};

/// Parse a raw expression into the combined filter state.
///
/// # Examples
///
/// ```
/// use opsdeck::cli::parse_query;
///
/// let filters = parse_query("status:open priority:high printer jam").unwrap();
/// assert_eq!(filters.search, "printer jam");
/// assert!(filters.dimensions["status"].contains("open"));
/// ```
pub fn parse_query(raw: &str) -> Result<FilterSet> {
    let mut filters = FilterSet::new();
    let mut remaining = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(value) = token.strip_prefix("status:") {
            filters.accept("status", value);
        } else if let Some(value) = token.strip_prefix("priority:") {
            filters.accept("priority", value);
        } else if let Some(value) = token.strip_prefix("category:") {
            filters.accept("category", value);
        } else if let Some(value) = token.strip_prefix("department:") {
            filters.accept("department", value);
        } else if let Some(value) = token.strip_prefix("due:") {
            let bucket: TimeBucket = value
                .parse()
                .map_err(OpsdeckError::Validation)?;
            filters.buckets.insert(bucket);
        } else {
            remaining.push(token);
        }
    }

    filters.search = remaining.join(" ");
    Ok(filters)
}
