//! Non-fatal load warnings.
//!
//! A bulk load degrades rather than fails when a secondary lookup or a
//! single stored value is bad: the record still appears in the list and
//! the problem is reported through one of these warnings.

/// A non-fatal problem encountered while loading records.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    /// A related lookup (assignee, uploader) failed; the denormalized
    /// field is left empty.
    MissingRelation {
        table: String,
        detail: String,
    },
    /// A stored categorical value is outside the declared enumeration;
    /// the record carries the unknown variant instead.
    UnknownCategory {
        table: String,
        column: String,
        value: String,
    },
    /// A stored timestamp or date did not parse; it is treated as the
    /// lowest possible value.
    BadTimestamp {
        table: String,
        column: String,
        value: String,
    },
}

/// Format a warning for display.
pub fn format_warning(warning: &LoadWarning) -> String {
    match warning {
        LoadWarning::MissingRelation { table, detail } => {
            format!("Warning: could not resolve related {} - {}", table, detail)
        }
        LoadWarning::UnknownCategory {
            table,
            column,
            value,
        } => {
            format!(
                "Warning: {}.{} value '{}' is not a known category",
                table, column, value
            )
        }
        LoadWarning::BadTimestamp {
            table,
            column,
            value,
        } => {
            format!("Warning: {}.{} value '{}' is not a valid date", table, column, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_missing_relation() {
        let warning = LoadWarning::MissingRelation {
            table: "employees".to_string(),
            detail: "assignee lookup failed".to_string(),
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("employees"));
        assert!(msg.contains("assignee lookup failed"));
    }

    #[test]
    fn test_format_unknown_category() {
        let warning = LoadWarning::UnknownCategory {
            table: "tickets".to_string(),
            column: "status".to_string(),
            value: "weird".to_string(),
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("tickets.status"));
        assert!(msg.contains("weird"));
    }

    #[test]
    fn test_format_bad_timestamp() {
        let warning = LoadWarning::BadTimestamp {
            table: "tasks".to_string(),
            column: "due_date".to_string(),
            value: "soon".to_string(),
        };
        let msg = format_warning(&warning);
        assert!(msg.contains("tasks.due_date"));
        assert!(msg.contains("soon"));
    }
}
