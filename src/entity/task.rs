// src/entity/task.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_date, decode_enum, decode_timestamp, require_id, Priority};
use crate::error::Result;
use crate::pipeline::{FieldValue, Listable};
use crate::storage::service::{text_column, Row, RowValue};
use crate::warnings::LoadWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Unknown,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    /// Assigned employee ids, loaded from the task_assignments join table.
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
    /// Resolved assignee display names; empty when the lookup degraded.
    #[serde(default)]
    pub assignee_names: Vec<String>,
}

impl Task {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: None,
            created_at: Utc::now(),
            assignee_ids: Vec::new(),
            assignee_names: Vec::new(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        Ok(Self {
            id: require_id(row, "tasks")?,
            title: text_column(row, "title").unwrap_or_default(),
            description: text_column(row, "description"),
            status: decode_enum(
                text_column(row, "status"),
                "tasks",
                "status",
                TaskStatus::Unknown,
                warnings,
            ),
            priority: decode_enum(
                text_column(row, "priority"),
                "tasks",
                "priority",
                Priority::Unknown,
                warnings,
            ),
            due_date: decode_date(text_column(row, "due_date"), "tasks", "due_date", warnings),
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "tasks",
                "created_at",
                warnings,
            ),
            assignee_ids: Vec::new(),
            assignee_names: Vec::new(),
        })
    }

    /// Primary-table columns only; assignments live in their own table.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("title".into(), self.title.as_str().into());
        row.insert("description".into(), RowValue::from(self.description.clone()));
        row.insert("status".into(), self.status.to_string().into());
        row.insert("priority".into(), self.priority.to_string().into());
        row.insert(
            "due_date".into(),
            RowValue::from(self.due_date.map(|d| d.format("%Y-%m-%d").to_string())),
        );
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

impl Listable for Task {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description"];

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => FieldValue::Text(self.id.to_string()),
            "title" => FieldValue::Text(self.title.clone()),
            "description" => FieldValue::from_opt_text(self.description.as_deref()),
            "status" => FieldValue::Text(self.status.to_string()),
            "priority" => FieldValue::Text(self.priority.to_string()),
            "due_date" => FieldValue::from_opt_date(self.due_date),
            "created_at" => FieldValue::Date(self.created_at),
            // Sorts by resolved display names, not the raw ids.
            "assignees" => {
                if self.assignee_names.is_empty() {
                    FieldValue::Missing
                } else {
                    FieldValue::Name(self.assignee_names.join(", "))
                }
            }
            _ => FieldValue::Missing,
        }
    }

    fn reference_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn is_terminal(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
