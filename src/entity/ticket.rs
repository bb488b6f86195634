// src/entity/ticket.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_enum, decode_timestamp, require_id, Priority};
use crate::error::Result;
use crate::pipeline::{FieldValue, Listable};
use crate::storage::service::{text_column, Row, RowValue};
use crate::warnings::LoadWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    Unknown,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Closed => write!(f, "closed"),
            TicketStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" | "inprogress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(format!("Invalid ticket status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Billing,
    Technical,
    Account,
    #[default]
    General,
    Unknown,
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketCategory::Billing => write!(f, "billing"),
            TicketCategory::Technical => write!(f, "technical"),
            TicketCategory::Account => write!(f, "account"),
            TicketCategory::General => write!(f, "general"),
            TicketCategory::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for TicketCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "billing" => Ok(TicketCategory::Billing),
            "technical" => Ok(TicketCategory::Technical),
            "account" => Ok(TicketCategory::Account),
            "general" => Ok(TicketCategory::General),
            _ => Err(format!("Invalid ticket category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub issue: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: Priority,
    pub category: TicketCategory,
    pub company: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(issue: String, company: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            issue,
            description: None,
            status: TicketStatus::default(),
            priority: Priority::default(),
            category: TicketCategory::default(),
            company,
            client_name: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        Ok(Self {
            id: require_id(row, "tickets")?,
            issue: text_column(row, "issue").unwrap_or_default(),
            description: text_column(row, "description"),
            status: decode_enum(
                text_column(row, "status"),
                "tickets",
                "status",
                TicketStatus::Unknown,
                warnings,
            ),
            priority: decode_enum(
                text_column(row, "priority"),
                "tickets",
                "priority",
                Priority::Unknown,
                warnings,
            ),
            category: decode_enum(
                text_column(row, "category"),
                "tickets",
                "category",
                TicketCategory::Unknown,
                warnings,
            ),
            company: text_column(row, "company").unwrap_or_default(),
            client_name: text_column(row, "client_name").unwrap_or_default(),
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "tickets",
                "created_at",
                warnings,
            ),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("issue".into(), self.issue.as_str().into());
        row.insert("description".into(), RowValue::from(self.description.clone()));
        row.insert("status".into(), self.status.to_string().into());
        row.insert("priority".into(), self.priority.to_string().into());
        row.insert("category".into(), self.category.to_string().into());
        row.insert("company".into(), self.company.as_str().into());
        row.insert("client_name".into(), self.client_name.as_str().into());
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

/// One internal history entry on a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketNote {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl TicketNote {
    pub fn new(ticket_id: Uuid, note: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            note,
            created_at: Utc::now(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        Ok(Self {
            id: require_id(row, "ticket_history")?,
            ticket_id: text_column(row, "ticket_id")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            note: text_column(row, "note").unwrap_or_default(),
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "ticket_history",
                "created_at",
                warnings,
            ),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("ticket_id".into(), self.ticket_id.to_string().into());
        row.insert("note".into(), self.note.as_str().into());
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

/// One chat message on a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TicketMessage {
    pub fn new(ticket_id: Uuid, author: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            author,
            message,
            created_at: Utc::now(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        Ok(Self {
            id: require_id(row, "ticket_chat")?,
            ticket_id: text_column(row, "ticket_id")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            author: text_column(row, "author").unwrap_or_default(),
            message: text_column(row, "message").unwrap_or_default(),
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "ticket_chat",
                "created_at",
                warnings,
            ),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("ticket_id".into(), self.ticket_id.to_string().into());
        row.insert("author".into(), self.author.as_str().into());
        row.insert("message".into(), self.message.as_str().into());
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

impl Listable for Ticket {
    const SEARCH_FIELDS: &'static [&'static str] =
        &["issue", "description", "company", "client_name"];

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => FieldValue::Text(self.id.to_string()),
            "issue" => FieldValue::Text(self.issue.clone()),
            "description" => FieldValue::from_opt_text(self.description.as_deref()),
            "status" => FieldValue::Text(self.status.to_string()),
            "priority" => FieldValue::Text(self.priority.to_string()),
            "category" => FieldValue::Text(self.category.to_string()),
            "company" => FieldValue::Text(self.company.clone()),
            "client_name" => FieldValue::Text(self.client_name.clone()),
            "created_at" => FieldValue::Date(self.created_at),
            _ => FieldValue::Missing,
        }
    }

    fn reference_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn is_terminal(&self) -> bool {
        matches!(self.status, TicketStatus::Resolved | TicketStatus::Closed)
    }
}
