// src/entity/employee.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_enum, decode_timestamp, require_id};
use crate::error::Result;
use crate::pipeline::{FieldValue, Listable};
use crate::storage::service::{text_column, Row};
use crate::warnings::LoadWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Engineering,
    Sales,
    Finance,
    Hr,
    #[default]
    Operations,
    Unknown,
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Department::Engineering => write!(f, "engineering"),
            Department::Sales => write!(f, "sales"),
            Department::Finance => write!(f, "finance"),
            Department::Hr => write!(f, "hr"),
            Department::Operations => write!(f, "operations"),
            Department::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "engineering" => Ok(Department::Engineering),
            "sales" => Ok(Department::Sales),
            "finance" => Ok(Department::Finance),
            "hr" => Ok(Department::Hr),
            "operations" | "ops" => Ok(Department::Operations),
            _ => Err(format!("Invalid department: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Department,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            department: Department::default(),
            role: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        Ok(Self {
            id: require_id(row, "employees")?,
            name: text_column(row, "name").unwrap_or_default(),
            email: text_column(row, "email").unwrap_or_default(),
            department: decode_enum(
                text_column(row, "department"),
                "employees",
                "department",
                Department::Unknown,
                warnings,
            ),
            role: text_column(row, "role").unwrap_or_default(),
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "employees",
                "created_at",
                warnings,
            ),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("name".into(), self.name.as_str().into());
        row.insert("email".into(), self.email.as_str().into());
        row.insert("department".into(), self.department.to_string().into());
        row.insert("role".into(), self.role.as_str().into());
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

impl Listable for Employee {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "role"];

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => FieldValue::Text(self.id.to_string()),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "role" => FieldValue::Text(self.role.clone()),
            "department" => FieldValue::Text(self.department.to_string()),
            "created_at" => FieldValue::Date(self.created_at),
            _ => FieldValue::Missing,
        }
    }

    fn reference_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn is_terminal(&self) -> bool {
        false
    }
}
