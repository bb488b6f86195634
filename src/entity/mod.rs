mod document;
mod employee;
mod subscription;
mod task;
mod ticket;

pub use document::{Document, DocumentCategory};
pub use employee::{Department, Employee};
pub use subscription::{Subscription, SubscriptionStatus};
pub use task::{Task, TaskStatus};
pub use ticket::{Ticket, TicketCategory, TicketMessage, TicketNote, TicketStatus};

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OpsdeckError, Result};
use crate::storage::service::{text_column, Row};
use crate::warnings::LoadWarning;

/// Record types managed by the store, as named on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Employee,
    Document,
    Task,
    Ticket,
    Subscription,
}

impl RecordKind {
    /// Primary table name for this record type.
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Employee => "employees",
            RecordKind::Document => "documents",
            RecordKind::Task => "tasks",
            RecordKind::Ticket => "tickets",
            RecordKind::Subscription => "subscriptions",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Employee => write!(f, "employee"),
            RecordKind::Document => write!(f, "document"),
            RecordKind::Task => write!(f, "task"),
            RecordKind::Ticket => write!(f, "ticket"),
            RecordKind::Subscription => write!(f, "subscription"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" | "employees" => Ok(RecordKind::Employee),
            "document" | "documents" | "doc" => Ok(RecordKind::Document),
            "task" | "tasks" => Ok(RecordKind::Task),
            "ticket" | "tickets" => Ok(RecordKind::Ticket),
            "subscription" | "subscriptions" | "sub" => Ok(RecordKind::Subscription),
            _ => Err(format!("Invalid record type: {}", s)),
        }
    }
}

/// Priority shared by tasks and tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    Unknown,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
            Priority::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "normal" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// Read and parse the id column; rows without a usable id are a
/// data-service error rather than a degradable field.
pub(crate) fn require_id(row: &Row, table: &str) -> Result<Uuid> {
    let raw = text_column(row, "id")
        .ok_or_else(|| OpsdeckError::Service(format!("{} row is missing an id", table)))?;
    raw.parse()
        .map_err(|_| OpsdeckError::Service(format!("{} row has a malformed id: {}", table, raw)))
}

/// Parse a stored categorical value, falling back to the type's unknown
/// variant instead of failing the whole row.
pub(crate) fn decode_enum<T>(
    raw: Option<String>,
    table: &str,
    column: &str,
    unknown: T,
    warnings: &mut Vec<LoadWarning>,
) -> T
where
    T: FromStr + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(table, column, value = %raw, "unrecognized categorical value");
            warnings.push(LoadWarning::UnknownCategory {
                table: table.to_string(),
                column: column.to_string(),
                value: raw,
            });
            unknown
        }
    }
}

/// Parse a stored RFC 3339 timestamp, degrading to the epoch so the row
/// still loads and sorts lowest.
pub(crate) fn decode_timestamp(
    raw: Option<String>,
    table: &str,
    column: &str,
    warnings: &mut Vec<LoadWarning>,
) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return DateTime::UNIX_EPOCH;
    };
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => {
            tracing::warn!(table, column, value = %raw, "unparseable timestamp");
            warnings.push(LoadWarning::BadTimestamp {
                table: table.to_string(),
                column: column.to_string(),
                value: raw,
            });
            DateTime::UNIX_EPOCH
        }
    }
}

/// Parse a stored `YYYY-MM-DD` date column; unparseable values degrade
/// to absent.
pub(crate) fn decode_date(
    raw: Option<String>,
    table: &str,
    column: &str,
    warnings: &mut Vec<LoadWarning>,
) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            tracing::warn!(table, column, value = %raw, "unparseable date");
            warnings.push(LoadWarning::BadTimestamp {
                table: table.to_string(),
                column: column.to_string(),
                value: raw,
            });
            None
        }
    }
}
